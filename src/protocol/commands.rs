//! # Raster Command Builders
//!
//! Byte-sequence builders for the Brother QL raster command set. Each
//! function returns the exact bytes for one command; the encoder in
//! [`super::raster`] sequences them into a job buffer.
//!
//! ## Command Structure
//!
//! Most commands start with `ESC i` (0x1B 0x69) followed by a selector
//! byte and parameters. Raster rows use single-letter opcodes. Page
//! control is a single byte (`0x0C` print page, `0x1A` print last page
//! and eject).
//!
//! ## Byte Order
//!
//! Multi-byte integers are **little-endian**: the 4-byte raster line
//! count 0x00000120 is sent as `[0x20, 0x01, 0x00, 0x00]`.

use crate::label::LabelKind;
use crate::printer::MediaProfile;

/// ESC (Escape) - command prefix byte
pub const ESC: u8 = 0x1B;

/// Print the current page and feed to the next
pub const PRINT_PAGE: u8 = 0x0C;

/// Print the last page of the job and eject
pub const PRINT_LAST_PAGE: u8 = 0x1A;

/// Preamble length: a run of NUL bytes flushes any half-received
/// command left in the printer's buffer from an interrupted job.
const INVALIDATE_LEN: usize = 200;

/// Clear the printer's command buffer.
pub fn invalidate() -> Vec<u8> {
    vec![0x00; INVALIDATE_LEN]
}

/// Initialize (ESC @): reset to power-on defaults.
pub fn initialize() -> Vec<u8> {
    vec![ESC, 0x40]
}

/// Request a status report (ESC i S).
pub fn status_request() -> Vec<u8> {
    vec![ESC, 0x69, 0x53]
}

/// Switch to raster command mode (ESC i a 01).
pub fn switch_to_raster() -> Vec<u8> {
    vec![ESC, 0x69, 0x61, 0x01]
}

/// Print-information header (ESC i z): media kind and dimensions plus
/// the raster line count for the page.
///
/// The validity flags announce which fields the printer should trust;
/// the recover flag asks it to continue printing on recoverable errors.
pub fn print_information(media: &MediaProfile, raster_lines: u32, first_page: bool) -> Vec<u8> {
    const PI_KIND: u8 = 0x02;
    const PI_WIDTH: u8 = 0x04;
    const PI_LENGTH: u8 = 0x08;
    const PI_QUALITY: u8 = 0x40;
    const PI_RECOVER: u8 = 0x80;

    let media_kind = match media.kind {
        LabelKind::Endless => 0x0A,
        LabelKind::DieCut | LabelKind::RoundDieCut => 0x0B,
    };

    let mut cmd = vec![
        ESC,
        0x69,
        0x7A,
        PI_KIND | PI_WIDTH | PI_LENGTH | PI_QUALITY | PI_RECOVER,
        media_kind,
        media.tape_mm.0,
        media.tape_mm.1,
    ];
    cmd.extend_from_slice(&raster_lines.to_le_bytes());
    cmd.push(if first_page { 0x00 } else { 0x01 });
    cmd.push(0x00);
    cmd
}

/// Various-mode bits (ESC i M): bit 6 enables the auto-cutter for the
/// page.
pub fn various_mode(auto_cut: bool) -> Vec<u8> {
    vec![ESC, 0x69, 0x4D, if auto_cut { 0x40 } else { 0x00 }]
}

/// Cut every `n` labels (ESC i A).
pub fn cut_every(n: u8) -> Vec<u8> {
    vec![ESC, 0x69, 0x41, n]
}

/// Expanded-mode bits (ESC i K): cut at end of job (bit 3), two-color
/// raster data follows (bit 0), 600 dpi output (bit 6).
pub fn expanded_mode(cut_at_end: bool, two_color: bool, hi_res: bool) -> Vec<u8> {
    let mut bits = 0u8;
    if two_color {
        bits |= 0x01;
    }
    if cut_at_end {
        bits |= 0x08;
    }
    if hi_res {
        bits |= 0x40;
    }
    vec![ESC, 0x69, 0x4B, bits]
}

/// Feed margin in dots (ESC i d), little-endian.
pub fn feed_margin(dots: u16) -> Vec<u8> {
    let mut cmd = vec![ESC, 0x69, 0x64];
    cmd.extend_from_slice(&dots.to_le_bytes());
    cmd
}

/// Disable raster compression (M 00): rows are sent uncompressed.
pub fn no_compression() -> Vec<u8> {
    vec![0x4D, 0x00]
}

/// Raster data plane selector for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Single-plane monochrome data (`g` opcode).
    Mono,
    /// Black plane of a two-color page (`w` opcode, plane 1).
    Black,
    /// Red plane of a two-color page (`w` opcode, plane 2).
    Red,
}

/// One raster row. `data` must already be packed to the head width
/// (90 bytes on 720-dot heads, 162 on wide heads).
pub fn raster_row(plane: Plane, data: &[u8]) -> Vec<u8> {
    let (opcode, selector) = match plane {
        Plane::Mono => (0x67, 0x00),
        Plane::Black => (0x77, 0x01),
        Plane::Red => (0x77, 0x02),
    };
    let mut cmd = Vec::with_capacity(3 + data.len());
    cmd.push(opcode);
    cmd.push(selector);
    cmd.push(data.len() as u8);
    cmd.extend_from_slice(data);
    cmd
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate() {
        let cmd = invalidate();
        assert_eq!(cmd.len(), 200);
        assert!(cmd.iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_initialize() {
        assert_eq!(initialize(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_status_request() {
        assert_eq!(status_request(), vec![0x1B, 0x69, 0x53]);
    }

    #[test]
    fn test_switch_to_raster() {
        assert_eq!(switch_to_raster(), vec![0x1B, 0x69, 0x61, 0x01]);
    }

    #[test]
    fn test_print_information_endless() {
        let media = MediaProfile::lookup("62").unwrap();
        let cmd = print_information(media, 0x0120, true);
        assert_eq!(
            cmd,
            vec![0x1B, 0x69, 0x7A, 0xCE, 0x0A, 62, 0, 0x20, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_print_information_die_cut_later_page() {
        let media = MediaProfile::lookup("29x90").unwrap();
        let cmd = print_information(media, 991, false);
        assert_eq!(cmd[4], 0x0B);
        assert_eq!(cmd[5], 29);
        assert_eq!(cmd[6], 90);
        assert_eq!(cmd[11], 0x01);
    }

    #[test]
    fn test_various_mode() {
        assert_eq!(various_mode(true), vec![0x1B, 0x69, 0x4D, 0x40]);
        assert_eq!(various_mode(false), vec![0x1B, 0x69, 0x4D, 0x00]);
    }

    #[test]
    fn test_cut_every() {
        assert_eq!(cut_every(1), vec![0x1B, 0x69, 0x41, 0x01]);
    }

    #[test]
    fn test_expanded_mode_bits() {
        assert_eq!(expanded_mode(false, false, false), vec![0x1B, 0x69, 0x4B, 0x00]);
        assert_eq!(expanded_mode(true, false, false), vec![0x1B, 0x69, 0x4B, 0x08]);
        assert_eq!(expanded_mode(true, true, false), vec![0x1B, 0x69, 0x4B, 0x09]);
        assert_eq!(expanded_mode(false, false, true), vec![0x1B, 0x69, 0x4B, 0x40]);
    }

    #[test]
    fn test_feed_margin_little_endian() {
        assert_eq!(feed_margin(35), vec![0x1B, 0x69, 0x64, 35, 0]);
        assert_eq!(feed_margin(0x0102), vec![0x1B, 0x69, 0x64, 0x02, 0x01]);
    }

    #[test]
    fn test_raster_row_mono() {
        let data = vec![0xAA; 90];
        let cmd = raster_row(Plane::Mono, &data);
        assert_eq!(&cmd[..3], &[0x67, 0x00, 90]);
        assert_eq!(cmd.len(), 93);
    }

    #[test]
    fn test_raster_row_planes() {
        let data = vec![0x00; 90];
        assert_eq!(&raster_row(Plane::Black, &data)[..3], &[0x77, 0x01, 90]);
        assert_eq!(&raster_row(Plane::Red, &data)[..3], &[0x77, 0x02, 90]);
    }
}
