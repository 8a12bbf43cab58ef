//! Authentication: token issuance and request extractors.
//!
//! This module provides extractors for:
//! - `AuthUser` - required bearer-token authentication
//! - `MaybeUser` - optional authentication that never rejects
//!
//! Tokens are HS256 JWTs signed with the configured shared secret and
//! expire [`TOKEN_TTL_SECONDS`] after issuance.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Token lifetime: one hour from issuance.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// JWT claims carried by RoadRater tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Issued at (unix seconds).
    pub iat: i64,

    /// Expiration time (unix seconds).
    pub exp: i64,
}

/// Sign a token for a user, valid for one hour.
///
/// # Errors
///
/// Returns `ApiError::Internal` if signing fails.
pub fn issue_token(user_id: i64, secret: &str) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id,
        iat: now,
        exp: now + TOKEN_TTL_SECONDS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
}

fn extract_bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Verify a token's signature and expiry; returns the user id on
/// success and `None` for any failure, without distinguishing the
/// cause.
fn verify_token(token: &str, secret: &str) -> Option<i64> {
    let validation = Validation::new(Algorithm::HS256);
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Some(data.claims.user_id),
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed");
            None
        }
    }
}

/// An authenticated user. Rejects with 401 when the header is missing
/// or the token fails verification.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The authenticated user's id.
    pub user_id: i64,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = extract_bearer(parts)
                .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

            let user_id = verify_token(token, &state.config.jwt_secret)
                .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

            Ok(AuthUser { user_id })
        })
    }
}

/// Optional authentication: carries the user id when a valid token was
/// supplied, and `None` otherwise. Never rejects the request.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<i64>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id =
                extract_bearer(parts).and_then(|token| verify_token(token, &state.config.jwt_secret));

            Ok(MaybeUser(user_id))
        })
    }
}
