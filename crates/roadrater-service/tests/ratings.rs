//! Rating submission and listing integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

fn eight_segments() -> TestHarness {
    TestHarness::with_segments(&[
        "First Avenue",
        "Second Avenue",
        "Third Avenue",
        "Fourth Avenue",
        "Fifth Avenue",
        "Sixth Avenue",
        "Seventh Avenue",
        "Main St Segment",
    ])
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn full_rating_scenario() {
    let harness = eight_segments();

    // Register → 201 with id and username.
    let register = harness
        .server
        .post("/auth/register")
        .json(&json!({ "username": "freshroadie1", "password": "Password123" }))
        .await;
    register.assert_status(StatusCode::CREATED);
    let registered: serde_json::Value = register.json();
    assert_eq!(registered["data"]["username"], "freshroadie1");

    let token = {
        let login = harness
            .server
            .post("/auth/login")
            .json(&json!({ "username": "freshroadie1", "password": "Password123" }))
            .await;
        login.assert_status_ok();
        let body: serde_json::Value = login.json();
        body["data"]["token"].as_str().unwrap().to_string()
    };

    // Rate segment 8 → 201 with the row echoed and the new average.
    let response = harness
        .server
        .post("/ratings")
        .add_header(axum::http::header::AUTHORIZATION, TestHarness::bearer(&token))
        .json(&json!({ "segmentId": 8, "rating": 5, "comment": "Smooth ride" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["rating"]["segment_id"], 8);
    assert_eq!(body["data"]["rating"]["rating"], 5);
    assert_eq!(body["data"]["rating"]["comment"], "Smooth ride");
    assert_eq!(body["data"]["segment"]["id"], 8);
    assert_eq!(body["data"]["newAverage"], 5.0);
}

#[tokio::test]
async fn new_average_includes_the_submitted_row() {
    let harness = eight_segments();
    let token = harness
        .register_and_login("freshroadie1", "Password123")
        .await;

    for (score, expected_average) in [(4, 4.0), (5, 4.5), (4, 4.33)] {
        let response = harness
            .server
            .post("/ratings")
            .add_header(axum::http::header::AUTHORIZATION, TestHarness::bearer(&token))
            .json(&json!({ "segmentId": 1, "rating": score }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["newAverage"], expected_average);
    }
}

#[tokio::test]
async fn submission_without_a_token_is_unauthorized() {
    let harness = eight_segments();

    let response = harness
        .server
        .post("/ratings")
        .json(&json!({ "segmentId": 1, "rating": 5 }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(harness.store.rating_count(), 0);
}

#[tokio::test]
async fn invalid_payloads_fail_validation_and_write_nothing() {
    let harness = eight_segments();
    let token = harness
        .register_and_login("freshroadie1", "Password123")
        .await;

    let response = harness
        .server
        .post("/ratings")
        .add_header(axum::http::header::AUTHORIZATION, TestHarness::bearer(&token))
        .json(&json!({ "segmentId": 0, "rating": 10, "comment": "x".repeat(501) }))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation failed");
    let details = body["details"].as_array().expect("violation list");
    assert_eq!(
        *details,
        vec![
            serde_json::json!("segmentId must be a positive integer"),
            serde_json::json!("rating must be between 1 and 5"),
            serde_json::json!("comment must be less than 500 characters"),
        ]
    );
    assert_eq!(harness.store.rating_count(), 0);
}

#[tokio::test]
async fn wrong_typed_fields_get_the_enveloped_400() {
    let harness = eight_segments();
    let token = harness
        .register_and_login("freshroadie1", "Password123")
        .await;

    // A string segmentId fails deserialization, not validation; the
    // failure must still arrive in the envelope.
    let response = harness
        .server
        .post("/ratings")
        .add_header(axum::http::header::AUTHORIZATION, TestHarness::bearer(&token))
        .json(&json!({ "segmentId": "1", "rating": 5 }))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert_eq!(harness.store.rating_count(), 0);
}

#[tokio::test]
async fn non_integer_ratings_fail_validation() {
    let harness = eight_segments();
    let token = harness
        .register_and_login("freshroadie1", "Password123")
        .await;

    let response = harness
        .server
        .post("/ratings")
        .add_header(axum::http::header::AUTHORIZATION, TestHarness::bearer(&token))
        .json(&json!({ "segmentId": 1, "rating": 4.5 }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(harness.store.rating_count(), 0);
}

#[tokio::test]
async fn unknown_segment_is_not_found_and_writes_nothing() {
    let harness = eight_segments();
    let token = harness
        .register_and_login("freshroadie1", "Password123")
        .await;

    // Validation passes; the transactional existence check fails.
    let response = harness
        .server
        .post("/ratings")
        .add_header(axum::http::header::AUTHORIZATION, TestHarness::bearer(&token))
        .json(&json!({ "segmentId": 99, "rating": 5 }))
        .await;

    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Road segment not found");
    assert_eq!(harness.store.rating_count(), 0);
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn ratings_feed_is_most_recent_first() {
    let harness = eight_segments();
    let token = harness
        .register_and_login("freshroadie1", "Password123")
        .await;

    for score in [1, 2, 3] {
        harness
            .server
            .post("/ratings")
            .add_header(axum::http::header::AUTHORIZATION, TestHarness::bearer(&token))
            .json(&json!({ "segmentId": 2, "rating": score }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = harness.server.get("/ratings/2").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let scores: Vec<i64> = body["data"]["ratings"]
        .as_array()
        .expect("ratings array")
        .iter()
        .map(|r| r["rating"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![3, 2, 1]);

    let statistics = &body["data"]["statistics"];
    assert_eq!(statistics["count"], 3);
    assert_eq!(statistics["average"], 2.0);
    assert_eq!(statistics["min"], 1);
    assert_eq!(statistics["max"], 3);
}

#[tokio::test]
async fn listing_personalizes_requested_by_when_authenticated() {
    let harness = eight_segments();
    let token = harness
        .register_and_login("freshroadie1", "Password123")
        .await;

    let anonymous = harness.server.get("/ratings/1").await;
    anonymous.assert_status_ok();
    let body: serde_json::Value = anonymous.json();
    assert!(body["data"]["requestedBy"].is_null());

    let authenticated = harness
        .server
        .get("/ratings/1")
        .add_header(axum::http::header::AUTHORIZATION, TestHarness::bearer(&token))
        .await;
    authenticated.assert_status_ok();
    let body: serde_json::Value = authenticated.json();
    assert_eq!(body["data"]["requestedBy"], 1);
}

#[tokio::test]
async fn listing_tolerates_an_invalid_token() {
    let harness = eight_segments();

    // Optional auth: a bad token degrades to anonymous, never a 401.
    let response = harness
        .server
        .get("/ratings/1")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_static("Bearer not-a-jwt"),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["data"]["requestedBy"].is_null());
}

#[tokio::test]
async fn listing_rejects_non_numeric_segment_ids() {
    let harness = eight_segments();

    let response = harness.server.get("/ratings/abc").await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "segmentId must be a positive integer");
}

#[tokio::test]
async fn listing_unknown_segment_is_not_found() {
    let harness = eight_segments();

    let response = harness.server.get("/ratings/99").await;

    response.assert_status_not_found();
}
