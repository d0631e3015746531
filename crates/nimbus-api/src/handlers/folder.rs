//! Folder CRUD, import, and export handlers.

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use bytes::Bytes;
use uuid::Uuid;
use validator::Validate;

use nimbus_core::error::AppError;

use crate::dto::request::{CreateFolderRequest, ExistsQuery, ImportQuery, MoveRequest, RenameRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ScopeQuery};
use crate::state::AppState;

/// GET /api/folders?path=/&drive_id=...
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let scope = query.scope(&auth);
    let folders = state
        .folder_service
        .list(&auth, &scope, &query.path)
        .await?;
    let files = state.file_service.list(&auth, &scope, &query.path).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "folders": folders, "files": files }
    })))
}

/// GET /api/folders/exists?name=&parent_path=/
pub async fn folder_exists(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExistsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let scope = crate::extractors::scope::resolve_scope(&auth, query.drive_id);
    let exists = state
        .folder_service
        .exists(&auth, &scope, &query.name, &query.parent_path)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "exists": exists }
    })))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let scope = crate::extractors::scope::resolve_scope(&auth, req.drive_id);
    let folder = state
        .folder_service
        .create(&auth, &scope, &req.name, &req.parent_path)
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let folder = state.folder_service.get(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}

/// PUT /api/folders/{id}
pub async fn rename_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let folder = state.folder_service.rename(&auth, id, &req.name).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let folder = state
        .folder_service
        .move_to(&auth, id, &req.new_path)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}

/// DELETE /api/folders/{id} — moves the folder to the trash
pub async fn trash_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let folder = state.trash_service.trash_folder(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}

/// POST /api/folders/import?path=/&conflict=merge — multipart zip upload
pub async fn import_zip(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ImportQuery>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut archive_name: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            archive_name = field.file_name().map(String::from);
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
            );
        }
    }

    let archive_name = archive_name.ok_or_else(|| AppError::validation("file is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file data is required"))?;

    let scope = crate::extractors::scope::resolve_scope(&auth, query.drive_id);
    let root_name = query.root_name(&archive_name);
    let summary = state
        .import_service
        .import(&auth, &scope, &query.path, root_name, data, query.conflict)
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": summary })))
}

/// GET /api/folders/{id}/export — streams the subtree as a zip
pub async fn export_zip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (name, data) = state.export_service.export_zip(&auth, id).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}\""),
        )
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
