//! Road segment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rating::RatingStats;

/// A rateable stretch of road.
///
/// Segments are pre-seeded or externally managed; there is no creation
/// endpoint. Coordinates are optional: a segment without them is not
/// mappable but can still be rated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoadSegment {
    /// Unique identifier.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Latitude, if the segment is geolocated.
    pub latitude: Option<f64>,

    /// Longitude, if the segment is geolocated.
    pub longitude: Option<f64>,

    /// When the segment was created.
    pub created_at: DateTime<Utc>,
}

/// A road segment merged with its aggregate rating figures.
///
/// `rating_count` and `average_rating` are zero when the segment has no
/// ratings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoadSummary {
    /// Unique identifier.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Latitude, if the segment is geolocated.
    pub latitude: Option<f64>,

    /// Longitude, if the segment is geolocated.
    pub longitude: Option<f64>,

    /// When the segment was created.
    pub created_at: DateTime<Utc>,

    /// Number of ratings submitted against this segment.
    pub rating_count: i64,

    /// Mean score at 2-decimal precision, 0 when unrated.
    pub average_rating: f64,
}

impl RoadSummary {
    /// Merge a segment with its aggregate statistics.
    #[must_use]
    pub fn from_segment(segment: RoadSegment, stats: &RatingStats) -> Self {
        Self {
            id: segment.id,
            name: segment.name,
            latitude: segment.latitude,
            longitude: segment.longitude,
            created_at: segment.created_at,
            rating_count: stats.count,
            average_rating: stats.average,
        }
    }
}
