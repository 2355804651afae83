//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always JSON.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use pampa_core::order::OrderValidationError;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cep::CepError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Postal-code lookup failed.
    #[error("CEP lookup error: {0}")]
    Cep(#[from] CepError),

    /// Order draft failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] OrderValidationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict with existing state (duplicate rating, duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
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
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Cep(err) => match err {
                CepError::UnknownCep(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
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
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => json!({ "error": "invalid credentials" }),
                AuthError::UserAlreadyExists => {
                    json!({ "error": "an account with this email already exists" })
                }
                AuthError::WeakPassword(msg) => json!({ "error": msg }),
                AuthError::InvalidEmail(_) => json!({ "error": "invalid email address" }),
                _ => json!({ "error": "authentication error" }),
            },
            Self::Cep(err) => match err {
                CepError::UnknownCep(cep) => {
                    json!({ "error": format!("postal code {cep} not found") })
                }
                _ => json!({ "error": "postal code lookup is unavailable" }),
            },
            Self::Validation(err) => json!({
                "error": "validation failed",
                "fields": err.fields,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_class_distinct_from_generic_failure() {
        // Duplicate ratings must surface as 409, not 500.
        let err = AppError::Database(RepositoryError::Conflict("rating already exists".into()));
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_is_unprocessable() {
        let err = AppError::Validation(OrderValidationError { fields: vec![] });
        assert_eq!(get_status(err), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
