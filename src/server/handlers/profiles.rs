//! Media profile API handlers.

use axum::Json;

use crate::printer::MediaProfile;

/// GET /api/profiles - List supported label media.
pub async fn list() -> Json<Vec<MediaProfile>> {
    Json(MediaProfile::all().to_vec())
}
