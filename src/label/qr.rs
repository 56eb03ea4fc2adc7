//! # QR Raster Generation
//!
//! Turns a text payload into a monochrome QR raster behind the
//! [`QrProvider`] seam.
//!
//! ## Payload Encoding
//!
//! The payload is UTF-8 with a leading byte-order mark. Many QR readers
//! use the BOM to disambiguate character sets, so the exact byte
//! sequence matters: decoding a printed symbol and stripping the BOM
//! must recover the original text.
//!
//! The symbol is rendered with a zero border; quiet-zone handling is the
//! label margin's job. Version/capacity grows automatically with the
//! payload.

use image::{Rgb, RgbImage};
use qrcode::{EcLevel, QrCode};

use crate::error::EtiquetaError;
use crate::label::{CorrectionLevel, ForeColor, QrStyle};

/// UTF-8 byte-order mark prepended to every QR payload.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Encode `text` as the BOM-prefixed UTF-8 byte sequence that goes into
/// the QR symbol.
pub fn bom_payload(text: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(UTF8_BOM.len() + text.len());
    payload.extend_from_slice(&UTF8_BOM);
    payload.extend_from_slice(text.as_bytes());
    payload
}

/// Seam between the layout engine and a concrete QR symbol encoder.
pub trait QrProvider {
    /// Produce a monochrome raster for `payload`: fill color on white,
    /// zero border, `style.module_size` pixels per module.
    fn encode(
        &self,
        payload: &[u8],
        style: &QrStyle,
        fill: ForeColor,
    ) -> Result<RgbImage, EtiquetaError>;
}

/// Production [`QrProvider`] backed by the qrcode crate.
pub struct QrCodeProvider;

impl QrProvider for QrCodeProvider {
    fn encode(
        &self,
        payload: &[u8],
        style: &QrStyle,
        fill: ForeColor,
    ) -> Result<RgbImage, EtiquetaError> {
        let ec_level = match style.correction {
            CorrectionLevel::L => EcLevel::L,
            CorrectionLevel::M => EcLevel::M,
            CorrectionLevel::Q => EcLevel::Q,
            CorrectionLevel::H => EcLevel::H,
        };

        let code = QrCode::with_error_correction_level(payload, ec_level)
            .map_err(|e| EtiquetaError::Render(format!("QR code generation failed: {}", e)))?;

        let cell = style.module_size.max(1);
        let modules = code.width() as u32;
        let size = modules * cell;

        // Red fill only when the foreground is exactly red; black otherwise.
        let fill_rgb = match fill {
            ForeColor::Red => Rgb([255u8, 0, 0]),
            ForeColor::Black => Rgb([0u8, 0, 0]),
        };

        let mut img = RgbImage::from_pixel(size, size, Rgb([255, 255, 255]));
        for qy in 0..modules {
            for qx in 0..modules {
                if code[(qx as usize, qy as usize)] == qrcode::Color::Dark {
                    for cy in 0..cell {
                        for cx in 0..cell {
                            img.put_pixel(qx * cell + cx, qy * cell + cy, fill_rgb);
                        }
                    }
                }
            }
        }

        Ok(img)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_payload_prefix() {
        let payload = bom_payload("hello");
        assert_eq!(&payload[..3], &UTF8_BOM);
        assert_eq!(&payload[3..], b"hello");
    }

    #[test]
    fn test_bom_round_trip() {
        let original = "grüße 漢字";
        let payload = bom_payload(original);
        // A reader that strips the BOM convention recovers the text.
        let stripped = payload.strip_prefix(&UTF8_BOM).unwrap();
        assert_eq!(std::str::from_utf8(stripped).unwrap(), original);
    }

    #[test]
    fn test_qr_raster_is_square_with_zero_border() {
        let provider = QrCodeProvider;
        let style = QrStyle {
            module_size: 3,
            correction: CorrectionLevel::L,
        };
        let img = provider
            .encode(&bom_payload("test"), &style, ForeColor::Black)
            .unwrap();
        assert_eq!(img.width(), img.height());
        // Zero border: version 1 is 21 modules, larger versions grow in
        // steps of 4, so the side is always a multiple of the cell size.
        assert_eq!(img.width() % 3, 0);
        // Finder pattern corner must be dark (no quiet zone offset).
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_red_fill_for_red_foreground() {
        let provider = QrCodeProvider;
        let style = QrStyle::default();
        let img = provider
            .encode(&bom_payload("red"), &style, ForeColor::Red)
            .unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_module_size_scales_raster() {
        let provider = QrCodeProvider;
        let small = provider
            .encode(
                b"abc",
                &QrStyle {
                    module_size: 1,
                    correction: CorrectionLevel::L,
                },
                ForeColor::Black,
            )
            .unwrap();
        let big = provider
            .encode(
                b"abc",
                &QrStyle {
                    module_size: 4,
                    correction: CorrectionLevel::L,
                },
                ForeColor::Black,
            )
            .unwrap();
        assert_eq!(big.width(), small.width() * 4);
    }

    #[test]
    fn test_oversized_payload_is_render_error() {
        let provider = QrCodeProvider;
        // Version 40 at EC level H caps out near 1.2 KB; 8 KB cannot fit.
        let huge = vec![b'a'; 8192];
        let err = provider
            .encode(
                &huge,
                &QrStyle {
                    module_size: 1,
                    correction: CorrectionLevel::H,
                },
                ForeColor::Black,
            )
            .unwrap_err();
        assert!(matches!(err, EtiquetaError::Render(_)));
    }
}
