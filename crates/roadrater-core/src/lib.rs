//! Core types and utilities for RoadRater.
//!
//! This crate provides the foundational types used throughout the RoadRater
//! backend:
//!
//! - **Users**: [`User`] (registration/login identities)
//! - **Roads**: [`RoadSegment`], [`RoadSummary`] (segments with aggregates)
//! - **Ratings**: [`Rating`], [`RatingStats`], [`SCORE_RANGE`]
//! - **Validation**: pure payload checks with no I/O
//! - **Paging**: [`PageParams`] with clamped page/limit handling
//!
//! Averages are arithmetic means of 1-5 integer scores, reported at
//! 2-decimal precision via [`round_to_two`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod paging;
pub mod rating;
pub mod road;
pub mod user;
pub mod validation;

pub use paging::PageParams;
pub use rating::{round_to_two, Rating, RatingStats, MAX_COMMENT_LENGTH, SCORE_RANGE};
pub use road::{RoadSegment, RoadSummary};
pub use user::User;
pub use validation::{
    validate_password, validate_rating, validate_username, RatingCandidate, ValidRating,
};
