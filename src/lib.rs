//! # Etiqueta - Label Printer Library
//!
//! Etiqueta is a Rust library and server for designing and printing
//! labels on Brother QL series thermal label printers. It provides:
//!
//! - **Layout engine**: text, QR and image compositing onto endless or
//!   die-cut label media
//! - **Print queue**: copy expansion, cut decisions, ordered dispatch
//! - **Protocol implementation**: raster command encoding
//! - **Transport**: USB character device and network (port 9100)
//! - **HTTP API**: preview and print endpoints for designer frontends
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use etiqueta::{
//!     label::{LabelContent, LabelSpec, Margins},
//!     layout::LayoutEngine,
//!     printer::{MediaProfile, PrinterModel, PrintQueue},
//!     transport::DeviceSpecifier,
//! };
//!
//! // Describe the label
//! let media = MediaProfile::lookup("62")?;
//! let spec = LabelSpec {
//!     width: 696,
//!     content: LabelContent::QrOnly("https://example.net/asset/42".to_string()),
//!     margin: Margins::new(20, 20, 12, 12),
//!     ..Default::default()
//! };
//!
//! // Queue three copies, cutting only after the last one
//! let engine = LayoutEngine::new();
//! let mut queue = PrintQueue::new(PrinterModel::Ql800, media);
//! queue.enqueue(spec, 3, true);
//!
//! // Send to the printer
//! let mut transport = DeviceSpecifier::parse("file:///dev/usb/lp0")?.open();
//! queue.flush(&engine, transport.as_mut(), Duration::from_secs(10))?;
//!
//! # Ok::<(), etiqueta::error::EtiquetaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`label`] | Label specifications and the layout engine |
//! | [`printer`] | Media catalog, printer models, print queue |
//! | [`protocol`] | Raster command encoding |
//! | [`render`] | Dithering and color reduction |
//! | [`transport`] | Device communication backends |
//! | [`fonts`] | Font catalog |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! QL series raster printers (QL-570 through QL-820NWB, plus the wide
//! QL-1050/1060N). Two-color printing requires a QL-8xx model and
//! black/red/white media.

pub mod error;
pub mod fonts;
pub mod label;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use error::EtiquetaError;
pub use label::layout;
pub use label::{LabelContent, LabelSpec};
pub use printer::{MediaProfile, PrintQueue, PrinterModel};
