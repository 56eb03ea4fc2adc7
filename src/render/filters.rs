//! # Color-Mode Reduction
//!
//! Reduces uploaded images to the color mode a label variant expects,
//! before the raster reaches the layout engine. The engine itself never
//! converts colors; it composites whatever raster it is handed.

use image::{DynamicImage, Rgb, RgbImage};

/// Luminance of an RGB pixel (Rec. 601 weights).
#[inline]
fn luminance(p: &Rgb<u8>) -> u8 {
    let [r, g, b] = p.0;
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) as u8
}

/// True for pixels that read as red rather than a shade of gray: a
/// dominant red channel with clearly weaker green and blue.
#[inline]
pub(crate) fn is_reddish(p: &Rgb<u8>) -> bool {
    let [r, g, b] = p.0;
    r > 96 && (r as i16 - g as i16) > 64 && (r as i16 - b as i16) > 64
}

/// Convert to grayscale, keeping an RGB buffer for compositing.
pub fn to_grayscale(img: &DynamicImage) -> DynamicImage {
    let gray = img.to_luma8();
    let mut out = RgbImage::new(gray.width(), gray.height());
    for (x, y, p) in gray.enumerate_pixels() {
        out.put_pixel(x, y, Rgb([p.0[0]; 3]));
    }
    DynamicImage::ImageRgb8(out)
}

/// Threshold to pure black and white. `threshold` is a percentage
/// (0-100) of full luminance; pixels darker than the cutoff print black.
pub fn to_black_white(img: &DynamicImage, threshold: u8) -> DynamicImage {
    let cutoff = (255u32 * threshold.min(100) as u32 / 100) as u8;
    let rgb = img.to_rgb8();
    let mut out = RgbImage::new(rgb.width(), rgb.height());
    for (x, y, p) in rgb.enumerate_pixels() {
        let v = if luminance(p) < cutoff { 0 } else { 255 };
        out.put_pixel(x, y, Rgb([v; 3]));
    }
    DynamicImage::ImageRgb8(out)
}

/// Separate into the three tones two-color media can reproduce:
/// reddish pixels become pure red, dark pixels pure black, the rest
/// white.
pub fn to_red_black(img: &DynamicImage) -> DynamicImage {
    let rgb = img.to_rgb8();
    let mut out = RgbImage::new(rgb.width(), rgb.height());
    for (x, y, p) in rgb.enumerate_pixels() {
        let mapped = if is_reddish(p) {
            Rgb([255, 0, 0])
        } else if luminance(p) < 128 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        };
        out.put_pixel(x, y, mapped);
    }
    DynamicImage::ImageRgb8(out)
}

// ============================================================================
// TESTS
// ============================================================================
