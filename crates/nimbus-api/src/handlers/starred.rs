//! Starred-items handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/starred
pub async fn list_starred(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let listing = state.starred_service.list(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": listing })))
}

/// PUT /api/folders/{id}/star — toggles, returns the new state
pub async fn toggle_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let starred = state.starred_service.toggle_folder(&auth, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "is_starred": starred }
    })))
}

/// PUT /api/files/{id}/star — toggles, returns the new state
pub async fn toggle_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let starred = state.starred_service.toggle_file(&auth, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "is_starred": starred }
    })))
}
