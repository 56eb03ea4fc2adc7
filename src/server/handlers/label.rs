//! Label preview and print handlers.

use axum::{
    Json,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::error::EtiquetaError;
use crate::printer::PrintQueue;

use super::super::request::LabelRequest;
use super::super::state::AppState;

fn bad_request(e: EtiquetaError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

/// Handle POST /api/preview - render the label as a PNG.
///
/// The preview path rotates the bitmap for display where feed and
/// reading orientation differ; the print path never does.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let req = LabelRequest::from_multipart(&mut multipart)
        .await
        .map_err(bad_request)?;
    let media = req.media(state.config.default_media).map_err(bad_request)?;
    let spec = req
        .to_spec(&state.fonts, media, state.config.default_font_family.as_deref())
        .map_err(bad_request)?;

    // Rendering is pure computation; keep it off the async workers.
    let render_state = state.clone();
    let png = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, EtiquetaError> {
        let bitmap = render_state.engine.generate(&spec, true)?;
        let mut bytes = Vec::new();
        bitmap
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| EtiquetaError::Render(format!("PNG encoding failed: {}", e)))?;
        Ok(bytes)
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Task error: {}", e),
        )
    })?
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render preview: {}", e),
        )
    })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Handle POST /api/print - render and print the label.
pub async fn print(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let req = match LabelRequest::from_multipart(&mut multipart).await {
        Ok(req) => req,
        Err(e) => return error_response(&e.to_string()),
    };
    let media = match req.media(state.config.default_media) {
        Ok(media) => media,
        Err(e) => return error_response(&e.to_string()),
    };
    let spec = match req.to_spec(
        &state.fonts,
        media,
        state.config.default_font_family.as_deref(),
    ) {
        Ok(spec) => spec,
        Err(e) => return error_response(&e.to_string()),
    };
    let (copies, cut_once) = (req.print_count, req.cut_once);

    // One job in flight per device; the gate is held across the whole
    // enqueue+flush so concurrent requests cannot interleave.
    let _gate = state.print_gate.lock().await;

    let print_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut queue = PrintQueue::new(print_state.config.model, media);
        queue.enqueue(spec, copies, cut_once);
        let mut transport = print_state.config.device.open();
        queue.flush(
            &print_state.engine,
            transport.as_mut(),
            print_state.config.write_timeout,
        )
    })
    .await;

    match result {
        Ok(Ok(status)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": format!("sent {} bytes to printer", status.bytes_written),
            })),
        )
            .into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "print failed");
            error_response(&format!("Print failed: {}", e))
        }
        Err(e) => error_response(&format!("Task error: {}", e)),
    }
}

/// Generate error response JSON.
fn error_response(error_msg: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": error_msg })),
    )
        .into_response()
}
