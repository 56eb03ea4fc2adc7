//! # Label Request Parsing
//!
//! Decodes the multipart form posted by label designer clients into a
//! [`LabelSpec`]. Field names and defaults follow the form keys of the
//! designer UI (`label_size`, `print_type`, `orientation`, margins in
//! dots, font family/style, QR options, image options, `print_count`,
//! `cut_once`).

use axum::extract::Multipart;

use crate::error::EtiquetaError;
use crate::fonts::{DEFAULT_STYLE, FontCatalog};
use crate::label::{
    CorrectionLevel, ForeColor, ImageMode, LabelContent, LabelSpec, Margins, Orientation,
    QrStyle, TextAlign, TextStyle,
};
use crate::printer::MediaProfile;
use crate::render::filters;

/// Raw request fields with their defaults applied.
#[derive(Debug)]
pub struct LabelRequest {
    pub label_size: Option<String>,
    pub print_type: String,
    pub orientation: String,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub font_family: Option<String>,
    pub font_style: Option<String>,
    pub font_size: u32,
    pub line_spacing: u32,
    pub text_align: String,
    pub text: String,
    pub qr_size: u32,
    pub qr_correction: String,
    pub image_mode: String,
    pub image_bw_threshold: u8,
    pub image_fit: bool,
    pub print_color: String,
    pub print_count: u32,
    pub cut_once: bool,
    /// Uploaded image attachment: filename and raw bytes.
    pub image: Option<(String, Vec<u8>)>,
}

impl Default for LabelRequest {
    fn default() -> Self {
        Self {
            label_size: None,
            print_type: "text".to_string(),
            orientation: "standard".to_string(),
            margin_left: 20,
            margin_right: 20,
            margin_top: 12,
            margin_bottom: 12,
            font_family: None,
            font_style: None,
            font_size: 70,
            line_spacing: 100,
            text_align: "center".to_string(),
            text: String::new(),
            qr_size: 10,
            qr_correction: "L".to_string(),
            image_mode: "grayscale".to_string(),
            image_bw_threshold: 70,
            image_fit: true,
            print_color: "black".to_string(),
            print_count: 1,
            cut_once: false,
            image: None,
        }
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, EtiquetaError> {
    value
        .trim()
        .parse()
        .map_err(|_| EtiquetaError::Config(format!("Invalid value for {}: {}", name, value)))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, EtiquetaError> {
    Ok(parse_field::<i64>(name, value)? != 0)
}

impl LabelRequest {
    /// Drain a multipart body into a request. Unknown fields are
    /// ignored so older and newer clients can share the endpoint.
    pub async fn from_multipart(multipart: &mut Multipart) -> Result<Self, EtiquetaError> {
        let mut req = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| EtiquetaError::Config(format!("Multipart error: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == "image" {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    EtiquetaError::Config(format!("Failed to read image field: {}", e))
                })?;
                if !bytes.is_empty() {
                    req.image = Some((filename, bytes.to_vec()));
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| EtiquetaError::Config(format!("Failed to read field {}: {}", name, e)))?;

            match name.as_str() {
                "label_size" => req.label_size = Some(value),
                "print_type" => req.print_type = value,
                "orientation" => req.orientation = value,
                "margin_left" => req.margin_left = parse_field(&name, &value)?,
                "margin_right" => req.margin_right = parse_field(&name, &value)?,
                "margin_top" => req.margin_top = parse_field(&name, &value)?,
                "margin_bottom" => req.margin_bottom = parse_field(&name, &value)?,
                "font_family" => req.font_family = Some(value),
                "font_style" => req.font_style = Some(value),
                "font_size" => req.font_size = parse_field(&name, &value)?,
                "line_spacing" => req.line_spacing = parse_field(&name, &value)?,
                "text_align" => req.text_align = value,
                "text" => req.text = value,
                "qrcode_size" => req.qr_size = parse_field(&name, &value)?,
                "qrcode_correction" => req.qr_correction = value,
                "image_mode" => req.image_mode = value,
                "image_bw_threshold" => req.image_bw_threshold = parse_field(&name, &value)?,
                "image_fit" => req.image_fit = parse_flag(&name, &value)?,
                "print_color" => req.print_color = value,
                "print_count" => req.print_count = parse_field(&name, &value)?,
                "cut_once" => req.cut_once = parse_flag(&name, &value)?,
                _ => {}
            }
        }

        Ok(req)
    }

    /// The media profile this request targets.
    pub fn media(
        &self,
        default: &'static MediaProfile,
    ) -> Result<&'static MediaProfile, EtiquetaError> {
        match &self.label_size {
            Some(id) => MediaProfile::lookup(id),
            None => Ok(default),
        }
    }

    fn orientation(&self) -> Orientation {
        if self.orientation == "rotated" {
            Orientation::Rotated
        } else {
            Orientation::Standard
        }
    }

    fn align(&self) -> TextAlign {
        match self.text_align.as_str() {
            "left" => TextAlign::Left,
            "right" => TextAlign::Right,
            _ => TextAlign::Center,
        }
    }

    fn content(&self) -> Result<LabelContent, EtiquetaError> {
        match self.print_type.as_str() {
            "text" => Ok(LabelContent::TextOnly(self.text.clone())),
            "qrcode" => Ok(LabelContent::QrOnly(self.text.clone())),
            "qrcode_text" => Ok(LabelContent::TextWithQr(self.text.clone())),
            _ => self.image_content(),
        }
    }

    fn image_content(&self) -> Result<LabelContent, EtiquetaError> {
        let (filename, bytes) = self.image.as_ref().ok_or_else(|| {
            EtiquetaError::Config("image print requested without an image attachment".to_string())
        })?;

        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !matches!(ext.as_str(), "png" | "jpg" | "jpeg") {
            return Err(EtiquetaError::Config(format!(
                "unsupported image attachment: {}",
                filename
            )));
        }

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| EtiquetaError::Render(format!("Failed to decode image: {}", e)))?;

        let (mode, raster) = match self.image_mode.as_str() {
            "grayscale" => (ImageMode::Grayscale, filters::to_grayscale(&decoded)),
            "red_black" | "red_and_black" => (ImageMode::RedBlack, filters::to_red_black(&decoded)),
            "colored" => (ImageMode::Colored, decoded),
            _ => (
                ImageMode::BlackWhite,
                filters::to_black_white(&decoded, self.image_bw_threshold),
            ),
        };
        Ok(LabelContent::Image { mode, raster })
    }

    /// Build the immutable label spec for this request.
    pub fn to_spec(
        &self,
        fonts: &FontCatalog,
        media: &'static MediaProfile,
        default_font_family: Option<&str>,
    ) -> Result<LabelSpec, EtiquetaError> {
        let orientation = self.orientation();
        let (width, height) = media.canvas_dots(orientation);
        let content = self.content()?;

        // Text-bearing variants need a resolved font path.
        let mut text_style = TextStyle {
            size: self.font_size,
            align: self.align(),
            line_spacing: self.line_spacing,
            ..Default::default()
        };
        if content.drawn_text().is_some() {
            let family = self
                .font_family
                .as_deref()
                .or(default_font_family)
                .ok_or_else(|| {
                    EtiquetaError::Config("no font family requested or configured".to_string())
                })?;
            let style = self.font_style.as_deref().unwrap_or(DEFAULT_STYLE);
            text_style.font_path = fonts.lookup(family, style)?.to_path_buf();
        }

        Ok(LabelSpec {
            width,
            height,
            content,
            orientation,
            kind: media.kind,
            margin: Margins::new(
                self.margin_left,
                self.margin_right,
                self.margin_top,
                self.margin_bottom,
            ),
            fore_color: if self.print_color == "red" {
                ForeColor::Red
            } else {
                ForeColor::Black
            },
            text_style,
            qr_style: QrStyle {
                module_size: self.qr_size,
                correction: CorrectionLevel::parse_lenient(&self.qr_correction),
            },
            image_fit: self.image_fit,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_designer_form() {
        let req = LabelRequest::default();
        assert_eq!(req.print_type, "text");
        assert_eq!(
            (req.margin_left, req.margin_right, req.margin_top, req.margin_bottom),
            (20, 20, 12, 12)
        );
        assert_eq!(req.font_size, 70);
        assert_eq!(req.line_spacing, 100);
        assert_eq!(req.qr_size, 10);
        assert_eq!(req.print_count, 1);
        assert!(req.image_fit);
        assert!(!req.cut_once);
    }

    #[test]
    fn test_image_print_without_attachment_is_config_error() {
        let req = LabelRequest {
            print_type: "image".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            req.content(),
            Err(EtiquetaError::Config(_))
        ));
    }

    #[test]
    fn test_unsupported_attachment_extension_is_config_error() {
        let req = LabelRequest {
            print_type: "image".to_string(),
            image: Some(("label.gif".to_string(), vec![1, 2, 3])),
            ..Default::default()
        };
        assert!(matches!(req.content(), Err(EtiquetaError::Config(_))));
    }

    #[test]
    fn test_corrupt_attachment_is_render_error() {
        let req = LabelRequest {
            print_type: "image".to_string(),
            image: Some(("label.png".to_string(), vec![1, 2, 3])),
            ..Default::default()
        };
        assert!(matches!(req.content(), Err(EtiquetaError::Render(_))));
    }

    #[test]
    fn test_qr_spec_needs_no_font() {
        let fonts = FontCatalog::default();
        let media = MediaProfile::lookup("62").unwrap();
        let req = LabelRequest {
            print_type: "qrcode".to_string(),
            text: "payload".to_string(),
            ..Default::default()
        };
        let spec = req.to_spec(&fonts, media, None).unwrap();
        assert!(matches!(spec.content, LabelContent::QrOnly(_)));
        assert_eq!((spec.width, spec.height), (696, 0));
    }

    #[test]
    fn test_text_spec_without_font_family_is_config_error() {
        let fonts = FontCatalog::default();
        let media = MediaProfile::lookup("62").unwrap();
        let req = LabelRequest::default();
        assert!(matches!(
            req.to_spec(&fonts, media, None),
            Err(EtiquetaError::Config(_))
        ));
    }

    #[test]
    fn test_rotated_orientation_swaps_canvas() {
        let fonts = FontCatalog::default();
        let media = MediaProfile::lookup("62").unwrap();
        let req = LabelRequest {
            print_type: "qrcode".to_string(),
            orientation: "rotated".to_string(),
            ..Default::default()
        };
        let spec = req.to_spec(&fonts, media, None).unwrap();
        assert_eq!((spec.width, spec.height), (0, 696));
        assert_eq!(spec.orientation, Orientation::Rotated);
    }
}
