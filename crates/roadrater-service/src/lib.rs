//! RoadRater HTTP API Service.
//!
//! This crate provides the HTTP API for crowdsourced road-quality
//! ratings, including:
//!
//! - Registration and login (JWT bearer tokens)
//! - Road segment listings with aggregate ratings
//! - Transactional rating submission with average recomputation
//! - A top-5 leaderboard
//!
//! # Authentication
//!
//! Tokens are HS256 JWTs signed with the configured shared secret and
//! expire one hour after issuance. Rating submission requires a token;
//! rating listings accept one optionally to personalize the response.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
