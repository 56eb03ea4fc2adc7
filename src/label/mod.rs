//! # Label Specifications
//!
//! This module defines the immutable label description consumed by the
//! layout engine and the print queue.
//!
//! A [`LabelSpec`] is constructed once per request and read-only during
//! rendering. Content, orientation and media kind are tagged unions so
//! every geometry decision downstream is an exhaustive match.
//!
//! ## Modules
//!
//! - [`layout`]: canvas sizing, scaling, placement and compositing
//! - [`text`]: text shaping seam and the ab_glyph implementation
//! - [`qr`]: QR raster seam and the qrcode implementation

pub mod layout;
pub mod qr;
pub mod text;

pub use layout::LayoutEngine;

use std::path::PathBuf;

use image::{DynamicImage, Rgb};
use serde::Serialize;

/// Reading orientation of the label relative to the feed direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Standard,
    Rotated,
}

/// Physical media kind.
///
/// Endless media is fed from a continuous roll: one axis is fixed by the
/// roll width, the other grows to fit content. Die-cut media is pre-sized
/// in both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    #[default]
    Endless,
    DieCut,
    RoundDieCut,
}

impl LabelKind {
    /// True for both rectangular and round die-cut media.
    #[inline]
    pub fn is_die_cut(&self) -> bool {
        matches!(self, Self::DieCut | Self::RoundDieCut)
    }
}

/// Horizontal alignment of multi-line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Foreground draw color. Red is only meaningful on red/black media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForeColor {
    #[default]
    Black,
    Red,
}

impl ForeColor {
    pub fn rgb(&self) -> Rgb<u8> {
        match self {
            Self::Black => Rgb([0, 0, 0]),
            Self::Red => Rgb([255, 0, 0]),
        }
    }
}

/// QR error-correction level. Higher tiers trade payload capacity for
/// damage tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionLevel {
    #[default]
    L,
    M,
    Q,
    H,
}

impl CorrectionLevel {
    /// Parse the single-letter form used by the web API. Unknown letters
    /// fall back to `L`, matching the lenient request parsing of the
    /// label designer UI.
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "M" | "m" => Self::M,
            "Q" | "q" => Self::Q,
            "H" | "h" => Self::H,
            _ => Self::L,
        }
    }
}

/// Color mode of a caller-supplied image raster.
///
/// The raster arrives already reduced to this mode (see
/// [`crate::render::filters`]); the mode only steers downstream dithering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    BlackWhite,
    Grayscale,
    RedBlack,
    Colored,
}

/// Label content variant. Exactly one payload is meaningful per variant:
/// the text for text variants (which doubles as the QR payload when a QR
/// symbol is present), or a source raster for image variants.
#[derive(Debug, Clone)]
pub enum LabelContent {
    TextOnly(String),
    QrOnly(String),
    TextWithQr(String),
    Image { mode: ImageMode, raster: DynamicImage },
}

impl Default for LabelContent {
    fn default() -> Self {
        Self::TextOnly(String::new())
    }
}

impl LabelContent {
    /// The text to draw, if this variant draws text.
    pub fn drawn_text(&self) -> Option<&str> {
        match self {
            Self::TextOnly(t) | Self::TextWithQr(t) => Some(t),
            Self::QrOnly(_) | Self::Image { .. } => None,
        }
    }

    /// The QR payload, if this variant carries a QR symbol.
    pub fn qr_payload(&self) -> Option<&str> {
        match self {
            Self::QrOnly(t) | Self::TextWithQr(t) => Some(t),
            Self::TextOnly(_) | Self::Image { .. } => None,
        }
    }

    /// Whether the rendered bitmap should be dithered on the way to the
    /// wire. Only a pure 1-bit monochrome image is exempt; every other
    /// variant (grayscale, red/black, colored, text, QR) dithers.
    pub fn wants_dither(&self) -> bool {
        !matches!(
            self,
            Self::Image {
                mode: ImageMode::BlackWhite,
                ..
            }
        )
    }
}

/// Margins in device dots: left, right, top, bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Margins {
    pub fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Font and paragraph styling for the text block.
#[derive(Debug, Clone)]
pub struct TextStyle {
    /// Resolved path to a TTF/OTF file.
    pub font_path: PathBuf,
    /// Font size in pixels.
    pub size: u32,
    pub align: TextAlign,
    /// Line spacing as a percentage of the font size; 100 is single-spaced.
    pub line_spacing: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_path: PathBuf::new(),
            size: 70,
            align: TextAlign::Center,
            line_spacing: 100,
        }
    }
}

impl TextStyle {
    /// Extra pixels inserted between lines, derived from the spacing
    /// percentage. 100% yields 0.
    pub fn spacing_px(&self) -> i32 {
        (self.size as f32 * (self.line_spacing as f32 - 100.0) / 100.0).round() as i32
    }
}

/// QR symbol styling.
#[derive(Debug, Clone, Copy)]
pub struct QrStyle {
    /// Pixel width of one QR module.
    pub module_size: u32,
    pub correction: CorrectionLevel,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            module_size: 10,
            correction: CorrectionLevel::L,
        }
    }
}

/// A complete, immutable label description.
///
/// `width` and `height` are device dots. For the growth axis of endless
/// media they are starting values only; [`LayoutEngine::generate`]
/// recomputes that axis to fit the content.
#[derive(Debug, Clone, Default)]
pub struct LabelSpec {
    pub width: u32,
    pub height: u32,
    pub content: LabelContent,
    pub orientation: Orientation,
    pub kind: LabelKind,
    pub margin: Margins,
    pub fore_color: ForeColor,
    pub text_style: TextStyle,
    pub qr_style: QrStyle,
    /// Scale a source image down to the printable area instead of using
    /// its native size. Never upscales.
    pub image_fit: bool,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dither_flag_per_variant() {
        let bw = LabelContent::Image {
            mode: ImageMode::BlackWhite,
            raster: DynamicImage::new_rgb8(1, 1),
        };
        assert!(!bw.wants_dither());

        for mode in [ImageMode::Grayscale, ImageMode::RedBlack, ImageMode::Colored] {
            let content = LabelContent::Image {
                mode,
                raster: DynamicImage::new_rgb8(1, 1),
            };
            assert!(content.wants_dither());
        }
        assert!(LabelContent::TextOnly("x".into()).wants_dither());
        assert!(LabelContent::QrOnly("x".into()).wants_dither());
    }

    #[test]
    fn test_text_and_qr_payload_accessors() {
        let both = LabelContent::TextWithQr("hello".into());
        assert_eq!(both.drawn_text(), Some("hello"));
        assert_eq!(both.qr_payload(), Some("hello"));

        let qr = LabelContent::QrOnly("payload".into());
        assert_eq!(qr.drawn_text(), None);
        assert_eq!(qr.qr_payload(), Some("payload"));

        let text = LabelContent::TextOnly("t".into());
        assert_eq!(text.drawn_text(), Some("t"));
        assert_eq!(text.qr_payload(), None);
    }

    #[test]
    fn test_spacing_px() {
        let style = TextStyle {
            size: 70,
            line_spacing: 100,
            ..Default::default()
        };
        assert_eq!(style.spacing_px(), 0);

        let style = TextStyle {
            size: 70,
            line_spacing: 150,
            ..Default::default()
        };
        assert_eq!(style.spacing_px(), 35);

        let style = TextStyle {
            size: 70,
            line_spacing: 300,
            ..Default::default()
        };
        assert_eq!(style.spacing_px(), 140);
    }

    #[test]
    fn test_correction_level_lenient_parse() {
        assert_eq!(CorrectionLevel::parse_lenient("M"), CorrectionLevel::M);
        assert_eq!(CorrectionLevel::parse_lenient("h"), CorrectionLevel::H);
        assert_eq!(CorrectionLevel::parse_lenient("bogus"), CorrectionLevel::L);
    }

    #[test]
    fn test_fore_color_rgb() {
        assert_eq!(ForeColor::Black.rgb(), Rgb([0, 0, 0]));
        assert_eq!(ForeColor::Red.rgb(), Rgb([255, 0, 0]));
    }
}
