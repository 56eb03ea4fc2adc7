//! # Raster Printer Protocol
//!
//! Command encoding for Brother QL series label printers.
//!
//! ## Modules
//!
//! - [`commands`]: byte-sequence builders for individual commands
//! - [`raster`]: the per-job encoder that turns bitmaps into complete
//!   command buffers
//!
//! A print job is one buffer: an invalidate/initialize preamble, then
//! one framed page per label (job header, mode bits, raster rows, page
//! end), with the final page terminated by the end-of-job marker
//! instead of the page marker.

pub mod commands;
pub mod raster;

pub use raster::{RasterEncoder, Rotation};
