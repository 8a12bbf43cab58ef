//! Rating types and aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Valid rating scores (inclusive).
pub const SCORE_RANGE: RangeInclusive<i32> = 1..=5;

/// Maximum comment length in characters.
pub const MAX_COMMENT_LENGTH: usize = 500;

/// A single user's score against a road segment.
///
/// Ratings are append-only: they are created by the submission endpoint
/// and never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    /// System-assigned identifier.
    pub id: i64,

    /// The rated road segment.
    pub segment_id: i64,

    /// The submitting user.
    pub user_id: i64,

    /// Integer score in [1, 5].
    pub rating: i32,

    /// Optional free-text comment (at most 500 characters).
    pub comment: Option<String>,

    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Aggregate rating statistics for one segment.
///
/// All fields are zero when the segment has no ratings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RatingStats {
    /// Number of ratings.
    pub count: i64,

    /// Arithmetic mean of all scores, rounded to 2 decimals.
    pub average: f64,

    /// Lowest score.
    pub min: i32,

    /// Highest score.
    pub max: i32,
}

/// Round a value to 2-decimal precision.
///
/// Averages are reported at this precision everywhere in the API.
#[must_use]
pub fn round_to_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
