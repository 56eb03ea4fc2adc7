//! # Media Profiles and Printer Models
//!
//! Static catalog of supported label media and printer hardware.
//!
//! ## Media
//!
//! A [`MediaProfile`] describes one label stock: its printable area in
//! device dots, its kind (endless roll, die-cut, round die-cut), the
//! tape dimensions in millimeters carried in the print-information
//! command, and whether the stock is red/black two-color capable.
//! Profile ids follow the tape naming convention (`"62"`, `"62red"`,
//! `"29x90"`, `"d24"`).
//!
//! ## Models
//!
//! A [`PrinterModel`] contributes the head width (raster row size) and
//! whether the hardware can drive two-color media.

use serde::Serialize;

use crate::error::EtiquetaError;
use crate::label::{LabelKind, Orientation};

/// One supported label stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaProfile {
    /// Stable identifier used in requests (e.g. `"62red"`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    pub kind: LabelKind,
    /// Printable area in device dots: (across the tape, along the tape).
    /// The along-tape value is 0 for endless media.
    pub dots_printable: (u32, u32),
    /// Tape dimensions in millimeters (width, length); length 0 for
    /// endless media. Reported to the printer in the job header.
    pub tape_mm: (u8, u8),
    /// True for red/black two-color stock.
    pub two_color: bool,
}

/// All supported media, in menu order.
pub const MEDIA_PROFILES: &[MediaProfile] = &[
    MediaProfile {
        id: "12",
        name: "12mm endless",
        kind: LabelKind::Endless,
        dots_printable: (106, 0),
        tape_mm: (12, 0),
        two_color: false,
    },
    MediaProfile {
        id: "29",
        name: "29mm endless",
        kind: LabelKind::Endless,
        dots_printable: (306, 0),
        tape_mm: (29, 0),
        two_color: false,
    },
    MediaProfile {
        id: "38",
        name: "38mm endless",
        kind: LabelKind::Endless,
        dots_printable: (413, 0),
        tape_mm: (38, 0),
        two_color: false,
    },
    MediaProfile {
        id: "50",
        name: "50mm endless",
        kind: LabelKind::Endless,
        dots_printable: (554, 0),
        tape_mm: (50, 0),
        two_color: false,
    },
    MediaProfile {
        id: "54",
        name: "54mm endless",
        kind: LabelKind::Endless,
        dots_printable: (590, 0),
        tape_mm: (54, 0),
        two_color: false,
    },
    MediaProfile {
        id: "62",
        name: "62mm endless",
        kind: LabelKind::Endless,
        dots_printable: (696, 0),
        tape_mm: (62, 0),
        two_color: false,
    },
    MediaProfile {
        id: "62red",
        name: "62mm endless (black/red/white)",
        kind: LabelKind::Endless,
        dots_printable: (696, 0),
        tape_mm: (62, 0),
        two_color: true,
    },
    MediaProfile {
        id: "102",
        name: "102mm endless",
        kind: LabelKind::Endless,
        dots_printable: (1164, 0),
        tape_mm: (102, 0),
        two_color: false,
    },
    MediaProfile {
        id: "17x54",
        name: "17mm x 54mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (165, 566),
        tape_mm: (17, 54),
        two_color: false,
    },
    MediaProfile {
        id: "17x87",
        name: "17mm x 87mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (165, 956),
        tape_mm: (17, 87),
        two_color: false,
    },
    MediaProfile {
        id: "23x23",
        name: "23mm x 23mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (202, 202),
        tape_mm: (23, 23),
        two_color: false,
    },
    MediaProfile {
        id: "29x42",
        name: "29mm x 42mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (306, 425),
        tape_mm: (29, 42),
        two_color: false,
    },
    MediaProfile {
        id: "29x90",
        name: "29mm x 90mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (306, 991),
        tape_mm: (29, 90),
        two_color: false,
    },
    MediaProfile {
        id: "39x48",
        name: "39mm x 48mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (425, 495),
        tape_mm: (39, 48),
        two_color: false,
    },
    MediaProfile {
        id: "52x29",
        name: "52mm x 29mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (578, 271),
        tape_mm: (52, 29),
        two_color: false,
    },
    MediaProfile {
        id: "62x29",
        name: "62mm x 29mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (696, 271),
        tape_mm: (62, 29),
        two_color: false,
    },
    MediaProfile {
        id: "62x100",
        name: "62mm x 100mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (696, 1109),
        tape_mm: (62, 100),
        two_color: false,
    },
    MediaProfile {
        id: "102x51",
        name: "102mm x 51mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (1164, 526),
        tape_mm: (102, 51),
        two_color: false,
    },
    MediaProfile {
        id: "102x152",
        name: "102mm x 152mm die-cut",
        kind: LabelKind::DieCut,
        dots_printable: (1164, 1660),
        tape_mm: (102, 152),
        two_color: false,
    },
    MediaProfile {
        id: "d12",
        name: "12mm round die-cut",
        kind: LabelKind::RoundDieCut,
        dots_printable: (94, 94),
        tape_mm: (12, 12),
        two_color: false,
    },
    MediaProfile {
        id: "d24",
        name: "24mm round die-cut",
        kind: LabelKind::RoundDieCut,
        dots_printable: (236, 236),
        tape_mm: (24, 24),
        two_color: false,
    },
    MediaProfile {
        id: "d58",
        name: "58mm round die-cut",
        kind: LabelKind::RoundDieCut,
        dots_printable: (618, 618),
        tape_mm: (58, 58),
        two_color: false,
    },
];

impl MediaProfile {
    /// Look up a profile by id.
    ///
    /// ## Example
    ///
    /// ```
    /// use etiqueta::printer::MediaProfile;
    ///
    /// let media = MediaProfile::lookup("62").unwrap();
    /// assert_eq!(media.dots_printable.0, 696);
    /// assert!(MediaProfile::lookup("999").is_err());
    /// ```
    pub fn lookup(id: &str) -> Result<&'static MediaProfile, EtiquetaError> {
        MEDIA_PROFILES
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| EtiquetaError::Config(format!("Unknown label size: {}", id)))
    }

    /// All supported media.
    pub fn all() -> &'static [MediaProfile] {
        MEDIA_PROFILES
    }

    /// Starting canvas dimensions (width, height) for a label on this
    /// media in the given orientation. The longer printable axis becomes
    /// the width in standard orientation; rotated orientation swaps the
    /// axes. For endless media the growth axis starts at 0 and is
    /// resolved by the layout engine.
    pub fn canvas_dots(&self, orientation: Orientation) -> (u32, u32) {
        let (mut w, mut h) = self.dots_printable;
        if h > w {
            std::mem::swap(&mut w, &mut h);
        }
        if orientation == Orientation::Rotated {
            std::mem::swap(&mut w, &mut h);
        }
        (w, h)
    }
}

/// Supported printer hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterModel {
    Ql570,
    Ql600,
    Ql700,
    Ql710W,
    Ql720NW,
    Ql800,
    Ql810W,
    Ql820NWB,
    Ql1050,
    Ql1060N,
}

impl PrinterModel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ql570 => "QL-570",
            Self::Ql600 => "QL-600",
            Self::Ql700 => "QL-700",
            Self::Ql710W => "QL-710W",
            Self::Ql720NW => "QL-720NW",
            Self::Ql800 => "QL-800",
            Self::Ql810W => "QL-810W",
            Self::Ql820NWB => "QL-820NWB",
            Self::Ql1050 => "QL-1050",
            Self::Ql1060N => "QL-1060N",
        }
    }

    /// Parse a model name as it appears in configuration ("QL-800").
    pub fn parse(s: &str) -> Result<Self, EtiquetaError> {
        let all = [
            Self::Ql570,
            Self::Ql600,
            Self::Ql700,
            Self::Ql710W,
            Self::Ql720NW,
            Self::Ql800,
            Self::Ql810W,
            Self::Ql820NWB,
            Self::Ql1050,
            Self::Ql1060N,
        ];
        all.iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| EtiquetaError::Config(format!("Unknown printer model: {}", s)))
    }

    /// Whether the hardware can drive red/black two-color media.
    pub fn two_color_support(&self) -> bool {
        matches!(self, Self::Ql800 | Self::Ql810W | Self::Ql820NWB)
    }

    /// Print head width in dots.
    pub fn head_dots(&self) -> u32 {
        match self {
            Self::Ql1050 | Self::Ql1060N => 1296,
            _ => 720,
        }
    }

    /// Raster row size in bytes (head width / 8).
    pub fn bytes_per_row(&self) -> usize {
        self.head_dots() as usize / 8
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_profile() {
        let media = MediaProfile::lookup("62red").unwrap();
        assert!(media.two_color);
        assert_eq!(media.kind, LabelKind::Endless);
        assert_eq!(media.dots_printable, (696, 0));
    }

    #[test]
    fn test_lookup_unknown_profile_is_config_error() {
        let err = MediaProfile::lookup("33").unwrap_err();
        assert!(matches!(err, EtiquetaError::Config(_)));
    }

    #[test]
    fn test_canvas_dots_endless() {
        let media = MediaProfile::lookup("62").unwrap();
        // Standard: fixed width, growing height.
        assert_eq!(media.canvas_dots(Orientation::Standard), (696, 0));
        // Rotated: growing width, fixed height.
        assert_eq!(media.canvas_dots(Orientation::Rotated), (0, 696));
    }

    #[test]
    fn test_canvas_dots_die_cut_long_axis_becomes_width() {
        let media = MediaProfile::lookup("62x100").unwrap();
        assert_eq!(media.canvas_dots(Orientation::Standard), (1109, 696));
        assert_eq!(media.canvas_dots(Orientation::Rotated), (696, 1109));
    }

    #[test]
    fn test_canvas_dots_round_die_cut() {
        let media = MediaProfile::lookup("d24").unwrap();
        assert_eq!(media.canvas_dots(Orientation::Standard), (236, 236));
        assert_eq!(media.canvas_dots(Orientation::Rotated), (236, 236));
    }

    #[test]
    fn test_model_parse() {
        assert_eq!(PrinterModel::parse("QL-800").unwrap(), PrinterModel::Ql800);
        assert_eq!(PrinterModel::parse("ql-820nwb").unwrap(), PrinterModel::Ql820NWB);
        assert!(PrinterModel::parse("QL-999").is_err());
    }

    #[test]
    fn test_two_color_models() {
        assert!(PrinterModel::Ql800.two_color_support());
        assert!(PrinterModel::Ql820NWB.two_color_support());
        assert!(!PrinterModel::Ql700.two_color_support());
    }

    #[test]
    fn test_row_bytes_match_head_dots() {
        for model in [PrinterModel::Ql700, PrinterModel::Ql1050] {
            assert_eq!(model.bytes_per_row() * 8, model.head_dots() as usize);
        }
    }
}
