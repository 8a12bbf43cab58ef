//! Health check handler.

use axum::response::IntoResponse;
use chrono::Utc;
use serde::Serialize;

use crate::response;

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthData {
    /// Always `true` while the service is up.
    pub ok: bool,
    /// Service name.
    pub service: String,
    /// Current server time, RFC 3339.
    pub timestamp: String,
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    response::ok(HealthData {
        ok: true,
        service: "roadrater-backend".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
