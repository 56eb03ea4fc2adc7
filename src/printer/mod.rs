//! # Printer Module
//!
//! Media catalog, printer models, and the per-device print queue.
//!
//! ## Modules
//!
//! - [`profile`]: label media catalog and printer hardware models
//! - [`queue`]: copy expansion, cut decisions, and ordered dispatch

pub mod profile;
pub mod queue;

pub use profile::{MediaProfile, PrinterModel};
pub use queue::{PrintQueue, RenderJob};
