//! Storage usage handler.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/storage/usage
pub async fn get_usage(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let usage = state.usage_service.usage(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": usage })))
}
