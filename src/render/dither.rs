//! # Binarization for Thermal Output
//!
//! Converts grayscale rasters to the binary dot decisions a thermal
//! head understands.
//!
//! Two modes:
//!
//! - **Bayer 8x8 ordered dithering** simulates continuous tone by
//!   varying dot density against a threshold matrix. Deterministic, no
//!   error propagation, and the halftone screen suits thermal media.
//! - **Fixed threshold** for rasters that are already 1-bit: dithering
//!   an image that only contains pure black and pure white would leave
//!   it untouched at best and chew the edges at worst.
//!
//! Thresholds are derived from the matrix as `(value + 0.5) / 64`, so
//! they never reach exactly 0 or 1: pure white never prints and pure
//! black always does, in both modes.

use image::GrayImage;

/// Bayer 8x8 dithering matrix. Values 0-63, arranged to minimize
/// visible artifacts in the halftone screen.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// How to binarize a grayscale raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binarization {
    /// Print a dot where luminance is below the cutoff (0-255).
    Threshold(u8),
    /// Bayer 8x8 ordered dithering.
    Bayer,
}

/// Dithering threshold for a pixel position, in (0, 1).
#[inline]
pub fn bayer_threshold(x: usize, y: usize) -> f32 {
    (BAYER8[y % 8][x % 8] as f32 + 0.5) / 64.0
}

/// Whether to print a dot at (x, y) for the given intensity
/// (0.0 = white, 1.0 = black).
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > bayer_threshold(x, y)
}

/// Binarize a grayscale raster into per-row dot decisions.
/// `true` means print (dark).
pub fn binarize(gray: &GrayImage, mode: Binarization) -> Vec<Vec<bool>> {
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let mut rows = Vec::with_capacity(height);
    for y in 0..height {
        let mut row = Vec::with_capacity(width);
        for x in 0..width {
            let luma = gray.get_pixel(x as u32, y as u32).0[0];
            let print = match mode {
                Binarization::Threshold(cutoff) => luma < cutoff,
                Binarization::Bayer => should_print(x, y, 1.0 - luma as f32 / 255.0),
            };
            row.push(print);
        }
        rows.push(row);
    }
    rows
}

/// Pack a row of dot decisions into bytes, MSB first.
///
/// ## Example
///
/// ```
/// use etiqueta::render::dither::pack_row;
///
/// let row = vec![true, true, false, false, true, false, true, false];
/// assert_eq!(pack_row(&row), vec![0b11001010]);
/// ```
pub fn pack_row(row: &[bool]) -> Vec<u8> {
    let mut packed = vec![0u8; row.len().div_ceil(8)];
    for (i, &on) in row.iter().enumerate() {
        if on {
            packed[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    packed
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_matrix_contains_all_values() {
        let mut seen = [false; 64];
        for row in &BAYER8 {
            for &v in row {
                seen[v as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_thresholds_never_reach_extremes() {
        for y in 0..8 {
            for x in 0..8 {
                let t = bayer_threshold(x, y);
                assert!(t > 0.0 && t < 1.0);
            }
        }
    }

    #[test]
    fn test_pure_black_and_white_survive_dithering() {
        // Black always prints, white never does, at every matrix position.
        for y in 0..8 {
            for x in 0..8 {
                assert!(should_print(x, y, 1.0));
                assert!(!should_print(x, y, 0.0));
            }
        }
    }

    #[test]
    fn test_midtone_prints_roughly_half() {
        let count = (0..8)
            .flat_map(|y| (0..8).map(move |x| should_print(x, y, 0.5)))
            .filter(|&p| p)
            .count();
        assert!((28..=36).contains(&count), "got {} dots", count);
    }

    #[test]
    fn test_binarize_threshold() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([10]));
        img.put_pixel(1, 0, Luma([200]));
        let rows = binarize(&img, Binarization::Threshold(128));
        assert_eq!(rows, vec![vec![true, false]]);
    }

    #[test]
    fn test_pack_row_partial_byte() {
        let row = vec![true, false, true];
        assert_eq!(pack_row(&row), vec![0b10100000]);
    }

    #[test]
    fn test_pack_row_multiple_bytes() {
        let mut row = vec![false; 16];
        row[0] = true;
        row[15] = true;
        assert_eq!(pack_row(&row), vec![0b10000000, 0b00000001]);
    }
}
