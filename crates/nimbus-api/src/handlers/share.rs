//! Share lifecycle and public token-access handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::dto::request::CreateShareRequest;
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShareRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let share = state
        .share_service
        .create(
            &auth,
            req.resource_type,
            req.resource_id,
            &req.shared_with,
            req.permission,
            req.expires_at,
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": share })))
}

/// GET /api/shares/received
pub async fn list_received(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let shares = state.share_service.list_received(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": shares })))
}

/// GET /api/shares/sent
pub async fn list_sent(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let shares = state.share_service.list_sent(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": shares })))
}

/// DELETE /api/shares/{id}
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.share_service.revoke(&auth, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": MessageResponse { message: "Share revoked".to_string() }
    })))
}

/// GET /api/s/{token} — public, no authentication
pub async fn access_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let access = state.share_service.access_by_token(&token).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": access })))
}
