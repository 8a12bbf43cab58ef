//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::middleware;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::envelope_for_status;
use crate::handlers::{auth, health, ratings, roads};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /auth/register` - Register a new user
/// - `POST /auth/login` - Log in, returns a bearer token
/// - `GET /roads` - Paged road segments with aggregate ratings
/// - `GET /roads/:id` - One segment merged with its statistics
/// - `GET /top5` - Top-5 leaderboard
///
/// ## Authenticated
/// - `GET /auth/me` - Current user (required auth)
/// - `POST /ratings` - Submit a rating (required auth)
/// - `GET /ratings/:segment_id` - Segment ratings feed (optional auth)
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health::health))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Roads
        .route("/roads", get(roads::list_roads))
        .route("/roads/:id", get(roads::get_road))
        .route("/top5", get(roads::top_roads))
        // Ratings
        .route("/ratings", post(ratings::create_rating))
        .route("/ratings/:segment_id", get(ratings::list_ratings))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .layer(middleware::map_response(envelope_bare_errors))
        .layer(cors)
        .with_state(state)
}

/// Rewrap error responses that bypass the handler stack (timeouts,
/// body limits, unmatched routes) so every failure carries the uniform
/// envelope. Enveloped errors already serialize as JSON and pass
/// through untouched.
async fn envelope_bare_errors(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if (status.is_client_error() || status.is_server_error()) && !is_json {
        return envelope_for_status(status);
    }
    response
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
