//! API error types and responses.
//!
//! The closed [`ApiError`] taxonomy is mapped exhaustively to HTTP
//! status codes and the uniform failure envelope
//! `{"success": false, "error": ..., "details": ...}` at this boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use roadrater_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// One or more payload rules failed; carries the full violation
    /// list. Detected before any I/O.
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// Missing or invalid credentials. The message never distinguishes
    /// which verification check failed.
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request - invalid input outside the validation layer.
    #[error("{0}")]
    BadRequest(String),

    /// Conflict - duplicate unique key.
    #[error("{0}")]
    Conflict(String),

    /// Internal server error. Logged with full detail server-side;
    /// clients receive a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON failure envelope.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            Self::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(serde_json::json!(violations)),
            ),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            Self::Conflict(message) => (StatusCode::CONFLICT, message, None),
            Self::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorEnvelope {
            success: false,
            error,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Wrap a bare error status (produced outside the handler stack, e.g.
/// by timeout or body-limit middleware, or the unmatched-route
/// fallback) in the failure envelope, preserving the status code.
pub(crate) fn envelope_for_status(status: StatusCode) -> Response {
    let body = ErrorEnvelope {
        success: false,
        error: status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
        details: None,
    };
    (status, Json(body)).into_response()
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => Self::NotFound(format!("{entity} not found")),
            StoreError::DuplicateUsername { .. } => {
                Self::Conflict("Username already exists".to_string())
            }
            StoreError::Database(message) => Self::Internal(message),
        }
    }
}
