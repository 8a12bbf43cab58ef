//! Registration, login, and current-user handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use roadrater_core::{validate_password, validate_username, User};

use crate::auth::{issue_token, AuthUser};
use crate::crypto;
use crate::error::ApiError;
use crate::extract::Json;
use crate::response;
use crate::state::AppState;

/// Registration/login request body. Fields are optional so missing
/// ones produce the structured 400 rather than a deserialization error.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Desired or existing username.
    pub username: Option<String>,
    /// Plaintext password; hashed immediately, never stored or echoed.
    pub password: Option<String>,
}

/// Registration response payload.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    /// The new user's id.
    pub id: i64,
    /// The new user's username.
    pub username: String,
}

/// Login response payload.
#[derive(Debug, Serialize)]
pub struct TokenData {
    /// Signed bearer token, valid for one hour.
    pub token: String,
}

/// Current-user response payload.
#[derive(Debug, Serialize)]
pub struct MeData {
    /// The authenticated user (password hash omitted).
    pub user: User,
}

fn require_credentials(body: CredentialsRequest) -> Result<(String, String), ApiError> {
    match (body.username, body.password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            Ok((username, password))
        }
        _ => Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        )),
    }
}

/// Register a new user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = require_credentials(body)?;
    let username = username.trim().to_string();

    // Credential checks short-circuit: first applicable violation only.
    validate_username(&username).map_err(|msg| ApiError::BadRequest(msg.to_string()))?;
    validate_password(&password).map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    let password_hash = tokio::task::spawn_blocking(move || crypto::hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))?;

    let user = state.store.create_user(&username, &password_hash).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(response::created(RegisteredUser {
        id: user.id,
        username: user.username,
    }))
}

/// Log a user in and issue a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = require_credentials(body)?;

    let user = state.store.user_by_username(username.trim()).await?;

    // Identical message whether the username is unknown or the
    // password is wrong.
    let Some(user) = user else {
        return Err(invalid_credentials());
    };

    let stored_hash = user.password_hash.clone();
    let valid =
        tokio::task::spawn_blocking(move || crypto::verify_password(&password, &stored_hash))
            .await
            .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))?;

    if !valid {
        return Err(invalid_credentials());
    }

    let token = issue_token(user.id, &state.config.jwt_secret)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(response::ok(TokenData { token }))
}

/// Return the authenticated user's profile.
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(response::ok(MeData { user }))
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}
