//! # HTTP Server for Label Design and Printing
//!
//! Serves the label designer API over HTTP.
//!
//! ## Endpoints
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/api/preview` | POST | Render a label spec to PNG |
//! | `/api/print` | POST | Render, encode and print a label batch |
//! | `/api/profiles` | GET | List supported label media |
//! | `/api/fonts` | GET | List font families |
//! | `/api/font/styles` | GET | Styles of one family |
//!
//! Preview and print take the same multipart form; `print_count` and
//! `cut_once` only matter when printing.

mod handlers;
mod request;
mod state;

pub use state::ServerConfig;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::EtiquetaError;
use crate::fonts::FontCatalog;
use state::AppState;

/// Image uploads dominate request size; 20MB covers label-sized scans.
const BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::time::Duration;
/// use etiqueta::fonts::FontCatalog;
/// use etiqueta::printer::{MediaProfile, PrinterModel};
/// use etiqueta::server::{ServerConfig, serve};
/// use etiqueta::transport::DeviceSpecifier;
///
/// # async fn example() -> Result<(), etiqueta::error::EtiquetaError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8013".to_string(),
///     device: DeviceSpecifier::parse("file:///dev/usb/lp0")?,
///     model: PrinterModel::Ql800,
///     default_media: MediaProfile::lookup("62")?,
///     default_font_family: Some("DejaVuSans".to_string()),
///     write_timeout: Duration::from_secs(10),
/// };
/// let fonts = FontCatalog::scan(&["/usr/share/fonts".into()]);
///
/// serve(config, fonts).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, fonts: FontCatalog) -> Result<(), EtiquetaError> {
    let listen_addr = config.listen_addr.clone();
    let app_state = Arc::new(AppState::new(config, fonts));

    let app = Router::new()
        .route("/api/preview", post(handlers::label::preview))
        .route("/api/print", post(handlers::label::print))
        .route("/api/profiles", get(handlers::profiles::list))
        .route("/api/fonts", get(handlers::fonts::families))
        .route("/api/font/styles", get(handlers::fonts::styles))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state.clone());

    info!(
        listen = %listen_addr,
        device = %app_state.config.device,
        model = app_state.config.model.name(),
        media = app_state.config.default_media.id,
        "label server starting"
    );

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| {
            EtiquetaError::Transmit(format!("Failed to bind to {}: {}", listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| EtiquetaError::Transmit(format!("Server error: {}", e)))?;

    Ok(())
}
