//! Unified error handling for the admin API.
//!
//! Mirrors the storefront's `AppError`: thiserror enum, JSON bodies, Sentry
//! capture for server-class errors only.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but lacks the admin role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict with existing state (duplicate fee entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => json!({ "error": "not found" }),
                RepositoryError::Conflict(msg) => json!({ "error": msg }),
                _ => json!({ "error": "internal server error" }),
            },
            Self::Internal(_) => json!({ "error": "internal server error" }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AdminError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AdminError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AdminError::Unauthorized("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AdminError::Forbidden("x".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AdminError::Conflict("x".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_duplicate_fee_maps_to_conflict() {
        let err = AdminError::Database(RepositoryError::Conflict(
            "a fee for this city and state already exists".into(),
        ));
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }
}
