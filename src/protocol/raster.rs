//! # Job Encoder
//!
//! Turns rendered label bitmaps into a complete raster command buffer.
//!
//! One encoder instance corresponds to one print job: it is created
//! fresh per flush, accumulates framed pages, and is consumed by
//! [`RasterEncoder::finish`]. Buffers are never reused.
//!
//! ## Print-Side Rotation
//!
//! The layout engine composes labels in reading orientation; the feed
//! axis does not always agree. The rotation hint resolves this here,
//! on the physical path only:
//!
//! - `Deg0` (endless, standard): feed axis is the canvas height.
//! - `Deg90` (endless, rotated): the canvas grew sideways; rotate a
//!   quarter turn so the growth axis becomes the feed axis.
//! - `Auto` (die-cut): rotate only when the bitmap matches the
//!   transposed printable area.
//!
//! After rotation the bitmap width must equal the media's printable
//! width, and for die-cut media the height must match the printable
//! length; anything else is an encode error, not a silent crop.

use std::borrow::Cow;

use image::{GrayImage, Luma, RgbImage, imageops};
use tracing::debug;

use crate::error::EtiquetaError;
use crate::printer::{MediaProfile, PrinterModel};
use crate::protocol::commands::{self, Plane};
use crate::render::dither::{Binarization, binarize, pack_row};
use crate::render::filters::is_reddish;

/// Feed margin in dots for endless media; die-cut media feeds to the
/// die edge on its own.
const ENDLESS_FEED_MARGIN: u16 = 35;

/// Cutoff used when a page is not dithered.
const MONO_CUTOFF: u8 = 128;

/// Physical rotation hint for one queued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Print as composed.
    Deg0,
    /// Rotate a quarter turn before rasterizing.
    Deg90,
    /// Driver-determined: rotate only if the transposed bitmap fits
    /// the printable area.
    Auto,
}

/// Accumulates framed label pages into one command buffer.
#[derive(Debug)]
pub struct RasterEncoder {
    model: PrinterModel,
    media: &'static MediaProfile,
    buf: Vec<u8>,
    pages: usize,
}

impl RasterEncoder {
    /// Start a new job buffer for the given hardware and media.
    pub fn new(
        model: PrinterModel,
        media: &'static MediaProfile,
    ) -> Result<Self, EtiquetaError> {
        if media.two_color && !model.two_color_support() {
            return Err(EtiquetaError::Config(format!(
                "{} cannot print two-color media {}",
                model.name(),
                media.id
            )));
        }

        let mut buf = Vec::new();
        buf.extend(commands::invalidate());
        buf.extend(commands::initialize());
        buf.extend(commands::status_request());
        buf.extend(commands::switch_to_raster());

        Ok(Self {
            model,
            media,
            buf,
            pages: 0,
        })
    }

    /// Number of pages encoded so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Encode one label bitmap as a framed page.
    pub fn encode_label(
        &mut self,
        bitmap: &RgbImage,
        dither: bool,
        cut: bool,
        rotation: Rotation,
    ) -> Result<(), EtiquetaError> {
        let (print_width, print_length) = self.media.dots_printable;

        let oriented: Cow<'_, RgbImage> = match rotation {
            Rotation::Deg0 => Cow::Borrowed(bitmap),
            Rotation::Deg90 => Cow::Owned(imageops::rotate270(bitmap)),
            Rotation::Auto => {
                if print_width != print_length
                    && (bitmap.width(), bitmap.height()) == (print_length, print_width)
                {
                    Cow::Owned(imageops::rotate270(bitmap))
                } else {
                    Cow::Borrowed(bitmap)
                }
            }
        };

        if oriented.width() != print_width {
            return Err(EtiquetaError::Encode(format!(
                "bitmap width {} does not match printable width {} of media {}",
                oriented.width(),
                print_width,
                self.media.id
            )));
        }
        if self.media.kind.is_die_cut() && oriented.height() != print_length {
            return Err(EtiquetaError::Encode(format!(
                "bitmap length {} does not match printable length {} of media {}",
                oriented.height(),
                print_length,
                self.media.id
            )));
        }

        let row_bytes = self.model.bytes_per_row();
        let head_dots = self.model.head_dots();
        if print_width > head_dots {
            return Err(EtiquetaError::Encode(format!(
                "media {} is wider than the {} print head",
                self.media.id,
                self.model.name()
            )));
        }
        // Center the printable area on the head.
        let offset = ((head_dots - print_width) / 2) as usize;

        let mode = if dither {
            Binarization::Bayer
        } else {
            Binarization::Threshold(MONO_CUTOFF)
        };

        let lines = oriented.height();
        debug!(
            page = self.pages,
            lines,
            dither,
            cut,
            media = self.media.id,
            "encoding label page"
        );

        self.buf
            .extend(commands::print_information(self.media, lines, self.pages == 0));
        self.buf.extend(commands::various_mode(cut));
        self.buf
            .extend(commands::expanded_mode(true, self.media.two_color, false));
        let margin = match self.media.kind {
            crate::label::LabelKind::Endless => ENDLESS_FEED_MARGIN,
            _ => 0,
        };
        self.buf.extend(commands::feed_margin(margin));
        self.buf.extend(commands::no_compression());

        if self.media.two_color {
            let (black, red) = split_red_black(&oriented);
            let black_rows = binarize(&black, mode);
            let red_rows = binarize(&red, mode);
            for (black_row, red_row) in black_rows.iter().zip(&red_rows) {
                self.buf.extend(commands::raster_row(
                    Plane::Black,
                    &pack_padded(black_row, offset, row_bytes),
                ));
                self.buf.extend(commands::raster_row(
                    Plane::Red,
                    &pack_padded(red_row, offset, row_bytes),
                ));
            }
        } else {
            let gray = imageops::grayscale(&*oriented);
            for row in &binarize(&gray, mode) {
                self.buf.extend(commands::raster_row(
                    Plane::Mono,
                    &pack_padded(row, offset, row_bytes),
                ));
            }
        }

        self.buf.push(commands::PRINT_PAGE);
        self.pages += 1;
        Ok(())
    }

    /// Close the job and return the buffer. The final page marker is
    /// replaced by the end-of-job marker. An encoder with no pages
    /// yields an empty buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pages == 0 {
            return Vec::new();
        }
        self.buf.pop();
        self.buf.push(commands::PRINT_LAST_PAGE);
        self.buf
    }
}

/// Split an RGB bitmap into black and red intensity planes for
/// two-color media. Reddish pixels go fully dark on the red plane and
/// disappear from the black plane; everything else keeps its luminance
/// on the black plane.
fn split_red_black(rgb: &RgbImage) -> (GrayImage, GrayImage) {
    let (w, h) = (rgb.width(), rgb.height());
    let mut black = GrayImage::new(w, h);
    let mut red = GrayImage::new(w, h);
    for (x, y, p) in rgb.enumerate_pixels() {
        if is_reddish(p) {
            black.put_pixel(x, y, Luma([255]));
            red.put_pixel(x, y, Luma([0]));
        } else {
            let [r, g, b] = p.0;
            let luma =
                (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) as u8;
            black.put_pixel(x, y, Luma([luma]));
            red.put_pixel(x, y, Luma([255]));
        }
    }
    (black, red)
}

/// Pack a row of dot decisions into `row_bytes` bytes with a left
/// offset in dots.
fn pack_padded(row: &[bool], offset: usize, row_bytes: usize) -> Vec<u8> {
    let mut padded = vec![false; row_bytes * 8];
    for (i, &on) in row.iter().enumerate() {
        let pos = offset + i;
        if pos < padded.len() {
            padded[pos] = on;
        }
    }
    pack_row(&padded)
}

// ============================================================================
// TESTS
// ============================================================================
