//! API handlers.

pub mod auth;
pub mod health;
pub mod ratings;
pub mod roads;

use crate::error::ApiError;

/// Parse a positive integer id from a path segment, mapping failures
/// to a 400 in the uniform envelope instead of axum's default
/// rejection body.
pub(crate) fn parse_id(raw: &str, field: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("{field} must be a positive integer")))
}
