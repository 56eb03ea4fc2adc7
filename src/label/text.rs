//! # Text Shaping
//!
//! Multi-line text measurement and drawing behind the [`TextShaper`]
//! seam, so the layout engine can be exercised with fixed metrics in
//! tests while production uses TTF fonts via ab_glyph.
//!
//! ## Layout Model
//!
//! Lines are stacked with a line height of `ascent - descent` plus the
//! style's extra spacing. Each line is aligned within the block width
//! (the widest line). Measurement returns the ink bounding box relative
//! to the block origin, so the `top` value is the gap between the block
//! origin and the first glyph's topmost pixel; the layout engine
//! subtracts it to compensate for font ascent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ab_glyph::{Font, FontArc, ScaleFont, point};
use image::{Rgb, RgbImage};

use crate::error::EtiquetaError;
use crate::label::{TextAlign, TextStyle};

/// Ink bounding box of a text block, relative to the block origin.
/// All values in pixels; `right - left` is the ink width and
/// `bottom - top` the ink height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl TextBounds {
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }
}

/// Measuring and drawing seam between the layout engine and a concrete
/// font rasterizer.
pub trait TextShaper {
    /// Measure the ink bounding box of `text` under `style`.
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextBounds, EtiquetaError>;

    /// Draw `text` onto `canvas` with the block origin at `origin`.
    fn draw(
        &self,
        canvas: &mut RgbImage,
        origin: (i64, i64),
        text: &str,
        style: &TextStyle,
        color: Rgb<u8>,
    ) -> Result<(), EtiquetaError>;
}

/// Horizontal offset of a line within its block for the given alignment.
pub(crate) fn align_offset(align: TextAlign, block_width: f32, line_width: f32) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => (block_width - line_width) / 2.0,
        TextAlign::Right => block_width - line_width,
    }
}

/// Production [`TextShaper`] backed by ab_glyph.
///
/// Fonts are loaded from disk on first use and cached by path for the
/// lifetime of the shaper.
pub struct AbGlyphShaper {
    cache: Mutex<HashMap<PathBuf, FontArc>>,
}

impl AbGlyphShaper {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn font_for(&self, path: &Path) -> Result<FontArc, EtiquetaError> {
        let mut cache = self.cache.lock().expect("font cache poisoned");
        if let Some(font) = cache.get(path) {
            return Ok(font.clone());
        }
        let data = std::fs::read(path).map_err(|e| {
            EtiquetaError::Render(format!("Failed to read font {}: {}", path.display(), e))
        })?;
        let font = FontArc::try_from_vec(data).map_err(|e| {
            EtiquetaError::Render(format!("Failed to parse font {}: {}", path.display(), e))
        })?;
        cache.insert(path.to_path_buf(), font.clone());
        Ok(font)
    }
}

impl Default for AbGlyphShaper {
    fn default() -> Self {
        Self::new()
    }
}

/// One shaped line: glyph ids with their caret x positions, plus the
/// advance width of the whole line.
struct ShapedLine {
    glyphs: Vec<(ab_glyph::GlyphId, f32)>,
    width: f32,
}

/// Shape every line of `text` at the given pixel size.
fn shape_lines(font: &FontArc, text: &str, px: f32) -> Vec<ShapedLine> {
    let scaled = font.as_scaled(px);
    text.split('\n')
        .map(|line| {
            let mut glyphs = Vec::new();
            let mut caret = 0.0f32;
            for ch in line.chars() {
                let id = font.glyph_id(ch);
                glyphs.push((id, caret));
                caret += scaled.h_advance(id);
            }
            ShapedLine {
                glyphs,
                width: caret,
            }
        })
        .collect()
}

/// Visit every positioned glyph of the block, yielding the glyph with its
/// final position. `block_width` is the widest line's advance width.
fn for_each_glyph<F>(font: &FontArc, text: &str, style: &TextStyle, mut visit: F)
where
    F: FnMut(ab_glyph::Glyph),
{
    let px = style.size as f32;
    let scaled = font.as_scaled(px);
    let lines = shape_lines(font, text, px);
    let block_width = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
    let line_height = (scaled.ascent() - scaled.descent()).ceil();
    let step = line_height + style.spacing_px() as f32;
    let ascent = scaled.ascent();

    for (i, line) in lines.iter().enumerate() {
        let x0 = align_offset(style.align, block_width, line.width);
        let baseline = i as f32 * step + ascent;
        for &(id, caret) in &line.glyphs {
            visit(id.with_scale_and_position(px, point(x0 + caret, baseline)));
        }
    }
}

impl TextShaper for AbGlyphShaper {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextBounds, EtiquetaError> {
        let font = self.font_for(&style.font_path)?;

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        let mut any = false;

        for_each_glyph(&font, text, style, |glyph| {
            if let Some(outlined) = font.outline_glyph(glyph) {
                let b = outlined.px_bounds();
                min_x = min_x.min(b.min.x);
                min_y = min_y.min(b.min.y);
                max_x = max_x.max(b.max.x);
                max_y = max_y.max(b.max.y);
                any = true;
            }
        });

        if !any {
            // Whitespace-only text has no ink.
            return Ok(TextBounds::default());
        }

        Ok(TextBounds {
            left: min_x.floor() as i64,
            top: min_y.floor() as i64,
            right: max_x.ceil() as i64,
            bottom: max_y.ceil() as i64,
        })
    }

    fn draw(
        &self,
        canvas: &mut RgbImage,
        origin: (i64, i64),
        text: &str,
        style: &TextStyle,
        color: Rgb<u8>,
    ) -> Result<(), EtiquetaError> {
        let font = self.font_for(&style.font_path)?;
        let (width, height) = (canvas.width() as i64, canvas.height() as i64);

        for_each_glyph(&font, text, style, |glyph| {
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let x = origin.0 + px as i64 + bounds.min.x as i64;
                    let y = origin.1 + py as i64 + bounds.min.y as i64;
                    if x >= 0 && x < width && y >= 0 && y < height {
                        let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                        for c in 0..3 {
                            let bg = pixel.0[c] as f32;
                            let fg = color.0[c] as f32;
                            pixel.0[c] = (bg + (fg - bg) * coverage.clamp(0.0, 1.0)) as u8;
                        }
                    }
                });
            }
        });

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_offset_left() {
        assert_eq!(align_offset(TextAlign::Left, 100.0, 40.0), 0.0);
    }

    #[test]
    fn test_align_offset_center() {
        assert_eq!(align_offset(TextAlign::Center, 100.0, 40.0), 30.0);
    }

    #[test]
    fn test_align_offset_right() {
        assert_eq!(align_offset(TextAlign::Right, 100.0, 40.0), 60.0);
    }

    #[test]
    fn test_bounds_height() {
        let b = TextBounds {
            left: 0,
            top: 12,
            right: 200,
            bottom: 80,
        };
        assert_eq!(b.height(), 68);
    }

    #[test]
    fn test_missing_font_is_render_error() {
        let shaper = AbGlyphShaper::new();
        let style = TextStyle {
            font_path: PathBuf::from("/nonexistent/font.ttf"),
            ..Default::default()
        };
        let err = shaper.measure("hi", &style).unwrap_err();
        assert!(matches!(err, EtiquetaError::Render(_)));
    }
}
