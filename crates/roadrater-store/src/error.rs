//! Error types for RoadRater storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Human-readable entity name (e.g. "Road segment").
        entity: &'static str,
        /// The id that was looked up.
        id: i64,
    },

    /// Username already taken (unique-constraint violation).
    #[error("duplicate username: {username}")]
    DuplicateUsername {
        /// The username that already exists.
        username: String,
    },

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
