//! Font catalog API handlers.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::super::state::AppState;

/// GET /api/fonts - List available font families.
pub async fn families(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.fonts.families().map(str::to_string).collect())
}

/// Query parameters for the styles endpoint.
#[derive(Debug, Deserialize)]
pub struct StylesQuery {
    pub font: Option<String>,
}

/// GET /api/font/styles - Styles of one family, mapped to font paths.
pub async fn styles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StylesQuery>,
) -> Result<Json<BTreeMap<String, String>>, (StatusCode, String)> {
    let family = query
        .font
        .or_else(|| state.config.default_font_family.clone())
        .ok_or((
            StatusCode::BAD_REQUEST,
            "no font family requested or configured".to_string(),
        ))?;

    let styles = state
        .fonts
        .styles(&family)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(
        styles
            .iter()
            .map(|(style, path)| (style.clone(), path.display().to_string()))
            .collect(),
    ))
}
