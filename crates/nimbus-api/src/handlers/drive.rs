//! Shared-drive handlers: lifecycle, membership, contents, and
//! cross-scope file moves.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use nimbus_core::error::AppError;

use crate::dto::request::{
    CrossScopeMoveRequest, DriveMemberRequest, DriveRequest, RemoveMemberRequest,
};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ScopeQuery};
use crate::state::AppState;

/// POST /api/drives
pub async fn create_drive(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<DriveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let drive = state
        .drive_service
        .create(&auth, &req.name, &req.description)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": drive })))
}

/// GET /api/drives
pub async fn list_drives(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let drives = state.drive_service.list(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": drives })))
}

/// GET /api/drives/{id}
pub async fn get_drive(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let drive = state.drive_service.get(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": drive })))
}

/// PUT /api/drives/{id}
pub async fn update_drive(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DriveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let drive = state
        .drive_service
        .update(&auth, id, &req.name, &req.description)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": drive })))
}

/// DELETE /api/drives/{id} — owner only, removes all content
pub async fn delete_drive(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.drive_service.delete(&auth, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": MessageResponse { message: "Drive deleted".to_string() }
    })))
}

/// GET /api/drives/{id}/contents?path=/
pub async fn drive_contents(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (folders, files) = state.drive_service.contents(&auth, id, &query.path).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "folders": folders, "files": files }
    })))
}

/// POST /api/drives/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DriveMemberRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let drive = state
        .drive_service
        .add_member(&auth, id, &req.email, req.role)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": drive })))
}

/// PUT /api/drives/{id}/members
pub async fn update_member_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DriveMemberRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let drive = state
        .drive_service
        .update_member_role(&auth, id, &req.email, req.role)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": drive })))
}

/// DELETE /api/drives/{id}/members
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RemoveMemberRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let drive = state
        .drive_service
        .remove_member(&auth, id, &req.email)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": drive })))
}

/// POST /api/drives/{id}/files/{file_id} — move a personal file in
pub async fn move_file_in(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, file_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CrossScopeMoveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = state
        .drive_service
        .move_file_in(&auth, file_id, id, &req.dest_path)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}

/// POST /api/drives/files/{file_id}/move-out — move a drive file back
/// into the requester's personal space
pub async fn move_file_out(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
    Json(req): Json<CrossScopeMoveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = state
        .drive_service
        .move_file_out(&auth, file_id, &req.dest_path)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}
