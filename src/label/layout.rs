//! # Label Layout Engine
//!
//! Composes the printable raster for a label: obtains the content
//! raster (QR symbol or caller-supplied image), scales it into the
//! printable area, measures the text block, resolves the final canvas
//! size for endless media, computes placement offsets, and composites
//! everything onto a white canvas.
//!
//! ## Geometry Rules
//!
//! Scaling and placement depend on `(orientation, kind)`:
//!
//! | orientation | kind | fit scale |
//! |-------------|------|-----------|
//! | Standard | Endless | `min(maxW/imgW, 1.0)` (height grows later) |
//! | Standard | die-cut | `min(maxW/imgW, maxH/imgH, 1.0)` |
//! | Rotated | Endless | `min(maxH/imgH, 1.0)` (width grows later) |
//! | Rotated | die-cut | `min(maxW/imgW, maxH/imgH, 1.0)` |
//!
//! The scale never exceeds 1.0: source images are never upscaled.
//!
//! Offset arithmetic uses floor division (`div_euclid`), so negative
//! intermediate values round toward negative infinity. The final canvas
//! is at least 1x1.
//!
//! ## Preview Rotation
//!
//! For endless/rotated and standard/die-cut labels the physical feed
//! direction differs from the natural reading orientation, so previews
//! are rotated a quarter turn clockwise. The bitmap handed to the
//! physical printing path is never rotated here; the raster encoder
//! owns print-side rotation.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::error::EtiquetaError;
use crate::label::qr::{QrCodeProvider, QrProvider, bom_payload};
use crate::label::text::{AbGlyphShaper, TextBounds, TextShaper};
use crate::label::{LabelContent, LabelKind, LabelSpec, Orientation};

/// Renders [`LabelSpec`]s into raster bitmaps.
///
/// Generic over the text shaping and QR encoding seams; the default
/// providers use ab_glyph and the qrcode crate.
pub struct LayoutEngine<S = AbGlyphShaper, Q = QrCodeProvider> {
    shaper: S,
    qr: Q,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            shaper: AbGlyphShaper::new(),
            qr: QrCodeProvider,
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TextShaper, Q: QrProvider> LayoutEngine<S, Q> {
    /// Build an engine with explicit providers. Tests use this to inject
    /// fixed font metrics and canned QR rasters.
    pub fn with_providers(shaper: S, qr: Q) -> Self {
        Self { shaper, qr }
    }

    /// Render `spec` to a raster bitmap.
    ///
    /// Deterministic given the spec and the providers: the same spec
    /// always yields the same bitmap. With `preview_rotate` the result
    /// is rotated for on-screen display where the feed direction and
    /// reading orientation disagree; the print path always passes
    /// `false`.
    pub fn generate(
        &self,
        spec: &LabelSpec,
        preview_rotate: bool,
    ) -> Result<RgbImage, EtiquetaError> {
        // Content raster: QR symbol, caller-supplied image, or none.
        let mut content: Option<RgbImage> = match &spec.content {
            LabelContent::QrOnly(t) | LabelContent::TextWithQr(t) => Some(self.qr.encode(
                &bom_payload(t),
                &spec.qr_style,
                spec.fore_color,
            )?),
            LabelContent::Image { raster, .. } => Some(raster.to_rgb8()),
            LabelContent::TextOnly(_) => None,
        };

        let mut width = spec.width as i64;
        let mut height = spec.height as i64;
        let (ml, mr) = (spec.margin.left as i64, spec.margin.right as i64);
        let (mt, mb) = (spec.margin.top as i64, spec.margin.bottom as i64);

        // Scale the content raster into the printable area.
        if let Some(img) = content.as_mut() {
            if img.width() == 0 || img.height() == 0 {
                return Err(EtiquetaError::Render(
                    "image raster has a zero dimension".to_string(),
                ));
            }
            if spec.image_fit {
                let max_w = (width - ml - mr).max(1);
                let max_h = (height - mt - mb).max(1);
                let scale =
                    fit_scale(spec.orientation, spec.kind, max_w, max_h, img.width(), img.height());
                debug!(scale, max_w, max_h, "fitting content raster");
                if scale < 1.0 {
                    let new_w = ((img.width() as f32 * scale) as u32).max(1);
                    let new_h = ((img.height() as f32 * scale) as u32).max(1);
                    *img = imageops::resize(&*img, new_w, new_h, FilterType::Lanczos3);
                }
            }
        }
        let (img_w, img_h) = content
            .as_ref()
            .map(|i| (i.width() as i64, i.height() as i64))
            .unwrap_or((0, 0));

        // Measure the text block, if any.
        let (text, bounds) = match spec.content.drawn_text() {
            Some(raw) => {
                let normalized = normalize_text(raw);
                let bounds = self.shaper.measure(&normalized, &spec.text_style)?;
                (Some(normalized), bounds)
            }
            None => (None, TextBounds::default()),
        };

        // Endless media grows along the feed axis to fit content;
        // die-cut media keeps the caller-supplied size.
        match (spec.orientation, spec.kind) {
            (Orientation::Standard, LabelKind::Endless) => {
                height = img_h + bounds.height() + mt + mb;
            }
            (Orientation::Rotated, LabelKind::Endless) => {
                width = img_w + bounds.right + ml + mr;
            }
            (_, LabelKind::DieCut | LabelKind::RoundDieCut) => {}
        }
        width = width.max(1);
        height = height.max(1);

        // Placement offsets. The text origin compensates for the measured
        // bounding-box top so the offset lands on the glyph ink, not the
        // glyph cell top.
        let (text_origin, image_origin) = match spec.orientation {
            Orientation::Standard => {
                let mut v_text = if spec.kind.is_die_cut() {
                    (height - img_h - bounds.height()).div_euclid(2) + (mt - mb).div_euclid(2)
                } else {
                    mt
                };
                v_text += img_h;
                let h_text = (width - bounds.right).div_euclid(2).max(0);
                let image = ((width - img_w).div_euclid(2), mt);
                ((h_text, v_text - bounds.top), image)
            }
            Orientation::Rotated => {
                let v_text =
                    (height - bounds.height()).div_euclid(2) + (mt - mb).div_euclid(2);
                let mut h_text = if spec.kind.is_die_cut() {
                    (width - img_w - bounds.right).div_euclid(2).max(0)
                } else {
                    ml
                };
                h_text += img_w;
                let image = (ml, (height - img_h).div_euclid(2));
                ((h_text, v_text - bounds.top), image)
            }
        };

        // Composite onto a white canvas.
        let mut canvas =
            RgbImage::from_pixel(width as u32, height as u32, Rgb([255, 255, 255]));
        if let Some(img) = &content {
            imageops::overlay(&mut canvas, img, image_origin.0, image_origin.1);
        }
        if let Some(text) = &text {
            self.shaper.draw(
                &mut canvas,
                text_origin,
                text,
                &spec.text_style,
                spec.fore_color.rgb(),
            )?;
        }

        if preview_rotate && preview_needs_rotation(spec.orientation, spec.kind) {
            canvas = imageops::rotate90(&canvas);
        }

        Ok(canvas)
    }
}

/// Scale factor that fits a `img_w` x `img_h` raster into the printable
/// area, by `(orientation, kind)`. Endless media constrains only the
/// fixed axis; the growth axis is resolved afterwards. Never upscales.
pub(crate) fn fit_scale(
    orientation: Orientation,
    kind: LabelKind,
    max_w: i64,
    max_h: i64,
    img_w: u32,
    img_h: u32,
) -> f32 {
    let w_ratio = max_w as f32 / img_w as f32;
    let h_ratio = max_h as f32 / img_h as f32;
    match (orientation, kind) {
        (Orientation::Standard, LabelKind::Endless) => w_ratio.min(1.0),
        (Orientation::Rotated, LabelKind::Endless) => h_ratio.min(1.0),
        (_, LabelKind::DieCut | LabelKind::RoundDieCut) => w_ratio.min(h_ratio).min(1.0),
    }
}

/// Replace empty lines with a single space. A blank line must still
/// occupy vertical space; a pure empty string collapses the measured
/// line box to zero height in the shaping primitive.
pub(crate) fn normalize_text(text: &str) -> String {
    text.split('\n')
        .map(|line| if line.is_empty() { " " } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether a preview must be rotated a quarter turn: the feed direction
/// differs from the reading orientation for exactly these combinations.
pub(crate) fn preview_needs_rotation(orientation: Orientation, kind: LabelKind) -> bool {
    match (orientation, kind) {
        (Orientation::Rotated, LabelKind::Endless) => true,
        (Orientation::Standard, LabelKind::DieCut | LabelKind::RoundDieCut) => true,
        (Orientation::Standard, LabelKind::Endless) => false,
        (Orientation::Rotated, LabelKind::DieCut | LabelKind::RoundDieCut) => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_nonempty_lines() {
        assert_eq!(normalize_text("a\nb"), "a\nb");
    }

    #[test]
    fn test_normalize_replaces_empty_lines() {
        assert_eq!(normalize_text("a\n\nb"), "a\n \nb");
        assert_eq!(normalize_text(""), " ");
        assert_eq!(normalize_text("a\n"), "a\n ");
    }

    #[test]
    fn test_fit_scale_endless_standard_ignores_height() {
        // Width-bound only: a very tall image is not constrained.
        let s = fit_scale(Orientation::Standard, LabelKind::Endless, 300, 1, 600, 5000);
        assert!((s - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fit_scale_endless_rotated_ignores_width() {
        let s = fit_scale(Orientation::Rotated, LabelKind::Endless, 1, 300, 5000, 600);
        assert!((s - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fit_scale_die_cut_constrains_both_axes() {
        for orientation in [Orientation::Standard, Orientation::Rotated] {
            let s = fit_scale(orientation, LabelKind::DieCut, 300, 150, 600, 600);
            assert!((s - 0.25).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_fit_scale_never_upscales() {
        let s = fit_scale(Orientation::Standard, LabelKind::Endless, 5000, 5000, 10, 10);
        assert_eq!(s, 1.0);
        let s = fit_scale(Orientation::Standard, LabelKind::RoundDieCut, 900, 900, 30, 30);
        assert_eq!(s, 1.0);
    }

    #[test]
    fn test_preview_rotation_table() {
        assert!(!preview_needs_rotation(Orientation::Standard, LabelKind::Endless));
        assert!(preview_needs_rotation(Orientation::Rotated, LabelKind::Endless));
        assert!(preview_needs_rotation(Orientation::Standard, LabelKind::DieCut));
        assert!(preview_needs_rotation(Orientation::Standard, LabelKind::RoundDieCut));
        assert!(!preview_needs_rotation(Orientation::Rotated, LabelKind::DieCut));
        assert!(!preview_needs_rotation(Orientation::Rotated, LabelKind::RoundDieCut));
    }
}
