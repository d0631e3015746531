//! Search handler.

use axum::extract::{Query, State};
use axum::Json;

use crate::dto::request::SearchQuery;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/search?q=...
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let results = state.search_service.search(&auth, &query.q).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": results })))
}
