use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::service::ServiceError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Domain rejections from the backend (duplicate application, not found,
/// unauthorized) arrive as structured `ServiceError` kinds and are dispatched
/// on the kind, never by matching message text.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("You have already applied to this job")]
    DuplicateApplication,

    #[error("Please create your candidate profile first")]
    ProfileRequired,

    #[error("Backend connection not established")]
    ConnectionNotReady,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::DuplicateApplication => AppError::DuplicateApplication,
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::Unauthorized => AppError::Unauthorized,
            other => AppError::Backend(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::DuplicateApplication => (
                StatusCode::CONFLICT,
                "DUPLICATE_APPLICATION",
                "You have already applied to this job".to_string(),
            ),
            AppError::ProfileRequired => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PROFILE_REQUIRED",
                "Please create your candidate profile first".to_string(),
            ),
            AppError::ConnectionNotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CONNECTION_NOT_READY",
                "Log in to connect to the backend first".to_string(),
            ),
            AppError::Backend(msg) => {
                tracing::warn!("Backend error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "BACKEND_ERROR",
                    "The backend request failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
