//! Persistence gateway for RoadRater.
//!
//! This crate provides storage for users, road segments, and ratings
//! behind the [`Store`] trait, so the service layer owns an injectable
//! gateway instance rather than a module-level pool.
//!
//! Two implementations exist:
//!
//! - [`PgStore`]: the production backend over PostgreSQL (sqlx). The
//!   rating submission runs as a single transaction.
//! - [`MemStore`]: an in-memory backend with identical semantics, used
//!   for test substitution.
//!
//! # Consistency
//!
//! [`Store::submit_rating`] is the only compound operation: the
//! segment-existence check, the rating insert, and the average
//! recomputation are atomic. Every other operation is an independent
//! statement and tolerates read skew under concurrent writers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod mem;
pub mod pg;
pub mod schema;

pub use error::{Result, StoreError};
pub use mem::MemStore;
pub use pg::PgStore;

use async_trait::async_trait;

use roadrater_core::{PageParams, Rating, RatingStats, RoadSegment, RoadSummary, User};

/// Result of the transactional rating submission.
#[derive(Debug, Clone)]
pub struct SubmittedRating {
    /// The inserted rating row, with its assigned id and timestamp.
    pub rating: Rating,

    /// The segment the rating was recorded against.
    pub segment: RoadSegment,

    /// The segment's recomputed average, including the new row,
    /// rounded to 2 decimals.
    pub new_average: f64,
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (PostgreSQL in production, in-memory for testing).
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateUsername`] if the username is
    /// taken, or a database error.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;

    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn user_by_id(&self, id: i64) -> Result<Option<User>>;

    // =========================================================================
    // Segment Operations
    // =========================================================================

    /// Look up a road segment by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn segment_by_id(&self, id: i64) -> Result<Option<RoadSegment>>;

    /// List one page of segments left-joined with their aggregates,
    /// ordered by segment id ascending, plus the total segment count.
    ///
    /// Callers clamp `page` before invoking this.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_segments_page(&self, page: PageParams) -> Result<(Vec<RoadSummary>, i64)>;

    /// The segments with the highest average rating, ties broken by
    /// higher rating count. Unrated segments sort last and never
    /// outrank a segment with at least one rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn top_segments(&self, limit: i64) -> Result<Vec<RoadSummary>>;

    // =========================================================================
    // Rating Operations
    // =========================================================================

    /// All ratings for a segment, most recent first.
    ///
    /// The descending creation-time order is contractual: clients
    /// render ratings in feed order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn ratings_for_segment(&self, segment_id: i64) -> Result<Vec<Rating>>;

    /// Aggregate statistics for a segment; all zeroes when unrated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn segment_stats(&self, segment_id: i64) -> Result<RatingStats>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Record a rating atomically: check the segment exists, insert the
    /// row, and recompute the segment average over the just-updated row
    /// set. Either all three steps are visible together or none persist.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the segment doesn't exist; the
    ///   transaction rolls back with no partial writes.
    /// - [`StoreError::Database`] if any statement fails.
    async fn submit_rating(
        &self,
        segment_id: i64,
        user_id: i64,
        score: i32,
        comment: Option<&str>,
    ) -> Result<SubmittedRating>;
}
