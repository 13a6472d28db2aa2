//! Registration and login

use crate::error::{validation_error, ApiError};
use crate::state::ApiState;
use axum::extract::State;
use axum::Json;
use tracing::{info, warn};
use validator::Validate;
use wayfind_core::security;
use wayfind_core::types::{LoginRequest, RegisterRequest, TokenResponse};
use wayfind_core::WayfindError;

/// Create an account and issue a bearer token.
///
/// The display name defaults to the email local-part.
pub async fn register(
    State(state): State<ApiState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(WayfindError::conflict(format!(
            "Email '{}' already registered",
            req.email
        ))
        .into());
    }

    let username = req.email.split('@').next().unwrap_or(&req.email);
    let password_hash = security::hash_password(&req.password)?;
    let user = state
        .users
        .create_user(&req.email, username, &password_hash)
        .await?;

    info!("Registered user {} ({})", user.id, user.email);

    let token = state.tokens.issue(&user.email)?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// Verify credentials and issue a bearer token
pub async fn login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    let Some(user) = state.users.find_by_email(&req.email).await? else {
        warn!("Failed login attempt for '{}'", req.email);
        return Err(WayfindError::auth("Incorrect email or password").into());
    };

    if !security::verify_password(&req.password, &user.password_hash)? {
        warn!("Failed login attempt for '{}'", req.email);
        return Err(WayfindError::auth("Incorrect email or password").into());
    }

    let token = state.tokens.issue(&user.email)?;
    Ok(Json(TokenResponse::bearer(token)))
}
