//! Trash listing, restore, and permanent-delete handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::dto::response::{CountResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/trash
pub async fn list_trash(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let listing = state.trash_service.list(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": listing })))
}

/// POST /api/trash/folders/{id}/restore
pub async fn restore_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let folder = state.trash_service.restore_folder(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}

/// POST /api/trash/files/{id}/restore
pub async fn restore_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = state.trash_service.restore_file(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}

/// DELETE /api/trash/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.trash_service.delete_folder_permanently(&auth, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": MessageResponse { message: "Folder permanently deleted".to_string() }
    })))
}

/// DELETE /api/trash/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.trash_service.delete_file_permanently(&auth, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": MessageResponse { message: "File permanently deleted".to_string() }
    })))
}

/// DELETE /api/trash — empties the requester's trash
pub async fn empty_trash(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = state.trash_service.empty(&auth).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": CountResponse { count }
    })))
}
