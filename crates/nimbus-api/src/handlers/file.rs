//! File CRUD, upload, and signed-URL handlers.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use bytes::Bytes;
use uuid::Uuid;

use nimbus_core::error::AppError;

use crate::dto::request::{ImportQuery, MoveRequest, RenameRequest};
use crate::dto::response::UrlResponse;
use crate::error::ApiError;
use crate::extractors::scope::resolve_scope;
use crate::extractors::{AuthUser, ScopeQuery};
use crate::state::AppState;
use validator::Validate;

/// GET /api/files?path=/&drive_id=...
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let scope = query.scope(&auth);
    let files = state.file_service.list(&auth, &scope, &query.path).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": files })))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = state.file_service.get(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}

/// POST /api/files/upload?path=/&drive_id=... — multipart upload.
///
/// Zip payloads are handed to the archive importer instead of being
/// stored as a single blob.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ImportQuery>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut file_name: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(String::from);
            mime_type = field.content_type().map(String::from);
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
            );
        }
    }

    let file_name = file_name.ok_or_else(|| AppError::validation("file is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file data is required"))?;

    let scope = resolve_scope(&auth, query.drive_id);

    if is_zip_payload(&file_name, mime_type.as_deref()) {
        let root_name = query.root_name(&file_name);
        let summary = state
            .import_service
            .import(&auth, &scope, &query.path, root_name, data, query.conflict)
            .await?;
        return Ok(Json(
            serde_json::json!({ "success": true, "data": summary }),
        ));
    }

    let file = state
        .file_service
        .upload(&auth, &scope, &query.path, &file_name, mime_type, data)
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}

fn is_zip_payload(file_name: &str, mime_type: Option<&str>) -> bool {
    file_name.to_lowercase().ends_with(".zip")
        || matches!(
            mime_type,
            Some("application/zip") | Some("application/x-zip-compressed")
        )
}

/// GET /api/files/{id}/download — returns a signed URL with attachment
/// disposition
pub async fn download_url(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let url = state.file_service.download_url(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": UrlResponse { url } }),
    ))
}

/// GET /api/files/{id}/preview — returns a signed URL for inline viewing
pub async fn preview_url(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let url = state.file_service.preview_url(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": UrlResponse { url } }),
    ))
}

/// PUT /api/files/{id}
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let file = state.file_service.rename(&auth, id, &req.name).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}

/// PUT /api/files/{id}/move
pub async fn move_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = state.file_service.move_to(&auth, id, &req.new_path).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}

/// DELETE /api/files/{id} — moves the file to the trash
pub async fn trash_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = state.trash_service.trash_file(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}
