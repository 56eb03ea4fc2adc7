//! Server state and configuration.

use std::time::Duration;

use tokio::sync::Mutex;

use crate::fonts::FontCatalog;
use crate::label::layout::LayoutEngine;
use crate::printer::{MediaProfile, PrinterModel};
use crate::transport::DeviceSpecifier;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8013")
    pub listen_addr: String,
    /// Printer device address
    pub device: DeviceSpecifier,
    pub model: PrinterModel,
    /// Media assumed when a request names no label size
    pub default_media: &'static MediaProfile,
    /// Font family assumed when a request names none
    pub default_font_family: Option<String>,
    /// Budget for one device transmission
    pub write_timeout: Duration,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub fonts: FontCatalog,
    pub engine: LayoutEngine,
    /// Serializes enqueue+flush against the device. The printer accepts
    /// one byte stream at a time; interleaved jobs would corrupt the
    /// output, so at most one print request runs at once.
    pub print_gate: Mutex<()>,
}

impl AppState {
    pub fn new(config: ServerConfig, fonts: FontCatalog) -> Self {
        Self {
            config,
            fonts,
            engine: LayoutEngine::new(),
            print_gate: Mutex::new(()),
        }
    }
}
