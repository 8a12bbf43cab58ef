//! Database schema definitions.
//!
//! Applied at startup by [`crate::PgStore::ensure_schema`]. Plain
//! idempotent DDL; there is no migration tooling.

/// Users table: identities with salted password hashes.
pub const CREATE_USERS: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// Road segments table. Coordinates are optional; a segment without
/// them is not mappable.
pub const CREATE_ROAD_SEGMENTS: &str = r"
CREATE TABLE IF NOT EXISTS road_segments (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    latitude DOUBLE PRECISION,
    longitude DOUBLE PRECISION,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// Ratings table. The segment reference is also checked explicitly
/// inside the submission transaction, not only by this constraint.
pub const CREATE_RATINGS: &str = r"
CREATE TABLE IF NOT EXISTS ratings (
    id BIGSERIAL PRIMARY KEY,
    segment_id BIGINT NOT NULL REFERENCES road_segments(id),
    user_id BIGINT NOT NULL REFERENCES users(id),
    rating INTEGER NOT NULL,
    comment TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// All DDL statements, in dependency order.
#[must_use]
pub fn all_statements() -> Vec<&'static str> {
    vec![CREATE_USERS, CREATE_ROAD_SEGMENTS, CREATE_RATINGS]
}
