//! Uniform success envelope.
//!
//! Every successful response is `{"success": true, "data": {...}}`;
//! failures are produced by [`crate::error::ApiError`].

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Success envelope wrapping a response payload.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always `true` for success responses.
    pub success: bool,

    /// The payload.
    pub data: T,
}

/// Wrap a payload as a 200 success response.
pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope { success: true, data }))
}

/// Wrap a payload as a 201 success response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope { success: true, data }),
    )
}
