//! # Error Types
//!
//! This module defines error types used throughout the etiqueta library.

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum EtiquetaError {
    /// Configuration errors (unknown label size, unknown font, invalid values)
    #[error("Config error: {0}")]
    Config(String),

    /// Rendering errors (unreadable font file, QR capacity exceeded, malformed raster)
    #[error("Render error: {0}")]
    Render(String),

    /// Command-encoding errors (bitmap does not fit the media, bad raster row)
    #[error("Encode error: {0}")]
    Encode(String),

    /// Device-transmission errors, including timeouts.
    /// Kept separate from [`EtiquetaError::Encode`] so callers can tell a
    /// wire failure from a bad print job.
    #[error("Transmit error: {0}")]
    Transmit(String),

    /// The printer acknowledged the job with a non-success status
    #[error("Printer status: {0}")]
    DeviceStatus(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
