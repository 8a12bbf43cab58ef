//! Rating submission and listing handlers.
//!
//! Submission is the one write path with a multi-step consistency
//! contract: validation happens before any I/O, and the store runs the
//! existence check, insert, and average recomputation in a single
//! transaction.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use roadrater_core::{
    validate_rating, Rating, RatingCandidate, RatingStats, RoadSegment,
};

use crate::auth::{AuthUser, MaybeUser};
use crate::error::ApiError;
use crate::extract::Json;
use crate::handlers::parse_id;
use crate::response;
use crate::state::AppState;

/// Rating submission request. Numeric fields deserialize as `f64` so
/// non-integer inputs reach the validator instead of failing at the
/// JSON layer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    /// Target segment id.
    pub segment_id: Option<f64>,
    /// Score, expected to be an integer in [1, 5].
    pub rating: Option<f64>,
    /// Optional comment, at most 500 characters after trimming.
    pub comment: Option<String>,
}

/// Submission response payload.
#[derive(Debug, Serialize)]
pub struct SubmitRatingData {
    /// The inserted rating row.
    pub rating: Rating,
    /// The rated segment.
    pub segment: RoadSegment,
    /// The segment's recomputed average, including the new row.
    #[serde(rename = "newAverage")]
    pub new_average: f64,
}

/// Ratings feed payload for one segment.
#[derive(Debug, Serialize)]
pub struct SegmentRatings {
    /// The segment.
    pub segment: RoadSegment,
    /// Aggregate statistics.
    pub statistics: RatingStats,
    /// All ratings, most recent first.
    pub ratings: Vec<Rating>,
    /// The requesting user's id when a valid token was supplied.
    #[serde(rename = "requestedBy")]
    pub requested_by: Option<i64>,
}

/// Submit a rating against a road segment. Requires authentication.
pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateRatingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Normalize before validating: trim the comment and drop it when
    // empty; the identity comes from the auth guard, not the body.
    let candidate = RatingCandidate {
        segment_id: body.segment_id,
        rating: body.rating,
        comment: body
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string),
        user_id: Some(auth.user_id),
    };

    let valid = validate_rating(&candidate).map_err(ApiError::Validation)?;

    let submitted = state
        .store
        .submit_rating(
            valid.segment_id,
            valid.user_id,
            valid.rating,
            valid.comment.as_deref(),
        )
        .await?;

    tracing::info!(
        user_id = %valid.user_id,
        segment_id = %valid.segment_id,
        rating = %valid.rating,
        "Rating recorded"
    );

    Ok(response::created(SubmitRatingData {
        rating: submitted.rating,
        segment: submitted.segment,
        new_average: submitted.new_average,
    }))
}

/// List all ratings for a segment, most recent first, with aggregate
/// statistics. Authentication is optional and only personalizes
/// `requestedBy`.
pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    MaybeUser(requested_by): MaybeUser,
    Path(segment_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let segment_id = parse_id(&segment_id, "segmentId")?;

    let segment = state
        .store
        .segment_by_id(segment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Road segment not found".to_string()))?;

    let ratings = state.store.ratings_for_segment(segment_id).await?;
    let statistics = state.store.segment_stats(segment_id).await?;

    Ok(response::ok(SegmentRatings {
        segment,
        statistics,
        ratings,
        requested_by,
    }))
}
