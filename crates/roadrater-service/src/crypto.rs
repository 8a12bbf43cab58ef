//! Password hashing.
//!
//! Argon2 with a per-password random salt. Handlers run these under
//! `tokio::task::spawn_blocking`; hashing is deliberately expensive
//! and must not stall the async runtime.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hash a password with a freshly generated salt.
///
/// # Errors
///
/// Returns an error if hashing fails (effectively only on invalid
/// parameters).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check a password against a stored hash.
///
/// Unparseable stored hashes count as a mismatch rather than an error;
/// callers respond with the same generic 401 either way.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
