//! # Raster Post-Processing
//!
//! Helpers that sit between the composed label bitmap and the wire:
//!
//! - [`dither`]: Bayer 8x8 ordered dithering, fixed thresholding, and
//!   bit packing for raster rows
//! - [`filters`]: color-mode reduction for uploaded images (grayscale,
//!   black/white threshold, red/black separation)

pub mod dither;
pub mod filters;
