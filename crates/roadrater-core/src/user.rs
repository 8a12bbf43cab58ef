//! User account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// The password is stored only as a salted hash and is never serialized
/// into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// System-assigned identifier.
    pub id: i64,

    /// Unique username (8+ characters, alphanumeric).
    pub username: String,

    /// Salted password hash. Never exposed over the wire.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
