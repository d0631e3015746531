//! Maps domain `AppError` to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use nimbus_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Newtype carrying an `AppError` out of a handler.
///
/// Handlers return `Result<_, ApiError>`; the `?` operator converts from
/// `AppError` via `From`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = match &err.kind {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::AccessDenied => (StatusCode::FORBIDDEN, "ACCESS_DENIED"),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::InvalidMove => (StatusCode::BAD_REQUEST, "INVALID_MOVE"),
            ErrorKind::DuplicateName => (StatusCode::CONFLICT, "DUPLICATE_NAME"),
            ErrorKind::Gone => (StatusCode::GONE, "GONE"),
            ErrorKind::Upstream => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => {
                tracing::error!(error = %err.message, kind = %err.kind, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: err.message.clone(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn error_kinds_map_to_expected_statuses() {
        assert_eq!(
            status_of(AppError::not_found("x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::access_denied("x")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::duplicate_name("x")),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(AppError::gone("x")), StatusCode::GONE);
        assert_eq!(
            status_of(AppError::invalid_move("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::internal("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
