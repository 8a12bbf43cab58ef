//! Common test utilities for roadrater integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::json;

use roadrater_service::{create_router, AppState, ServiceConfig};
use roadrater_store::MemStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The in-memory store, kept for direct seeding and assertions.
    pub store: Arc<MemStore>,
}

impl TestHarness {
    /// Create a new test harness with an empty in-memory store.
    pub fn new() -> Self {
        let store = Arc::new(MemStore::new());
        let state = AppState::new(store.clone(), test_config());
        let router: Router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, store }
    }

    /// Create a harness with road segments seeded as ids 1..=n.
    pub fn with_segments(names: &[&str]) -> Self {
        let harness = Self::new();
        for (index, name) in names.iter().enumerate() {
            harness.store.seed_segment(index as i64 + 1, name, None, None);
        }
        harness
    }

    /// Register a user and log in, returning the bearer token.
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        self.server
            .post("/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = self
            .server
            .post("/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        body["data"]["token"]
            .as_str()
            .expect("login response should carry a token")
            .to_string()
    }

    /// Authorization header value for a bearer token.
    pub fn bearer(token: &str) -> axum::http::HeaderValue {
        axum::http::HeaderValue::from_str(&format!("Bearer {token}"))
            .expect("token should be a valid header value")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config() -> ServiceConfig {
    ServiceConfig {
        port: 0,
        cors_origins: vec!["*".into()],
        jwt_secret: "integration-test-secret".into(),
        database_url: "postgres://unused".into(),
        max_body_bytes: 1024 * 1024,
        request_timeout_seconds: 30,
    }
}
