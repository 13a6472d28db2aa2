//! Profile and favorites

use crate::error::{validation_error, ApiError};
use crate::extract::AuthUser;
use crate::state::ApiState;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;
use tracing::info;
use validator::Validate;
use wayfind_core::catalog::ProfileChanges;
use wayfind_core::security;
use wayfind_core::types::{ProfileResponse, UpdateProfileRequest, UserResponse};
use wayfind_core::WayfindError;

/// Authenticated profile with the favorites list
pub async fn me(
    AuthUser(user): AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let favorites = state.users.favorites_of(user.id).await?;
    Ok(Json(ProfileResponse {
        id: user.id,
        email: user.email,
        username: user.username,
        favorites,
    }))
}

/// Change username and/or password.
///
/// A password change requires the current password and is verified before
/// anything is written.
pub async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<ApiState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    let new_hash = if req.wants_password_change() {
        let old_password = req.old_password.as_deref().ok_or_else(|| {
            WayfindError::validation("old_password is required to change the password")
        })?;
        if !security::verify_password(old_password, &user.password_hash)? {
            return Err(WayfindError::auth("Current password is incorrect").into());
        }
        // wants_password_change() implies new_password is present
        req.new_password
            .as_deref()
            .map(security::hash_password)
            .transpose()?
    } else {
        None
    };

    let updated = state
        .users
        .update_profile(
            user.id,
            ProfileChanges {
                username: req.username,
                password_hash: new_hash,
            },
        )
        .await?;

    info!("Updated profile for user {}", updated.id);
    Ok(Json(UserResponse::from(&updated)))
}

/// Bookmark a place. Idempotent; 404 for an unknown place.
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(state): State<ApiState>,
    Path(place_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.users.add_favorite(user.id, place_id).await?;
    Ok(Json(json!({ "status": "added" })))
}

/// Remove a bookmark. Removing a non-favorite is a no-op.
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(state): State<ApiState>,
    Path(place_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.users.remove_favorite(user.id, place_id).await?;
    Ok(Json(json!({ "status": "removed" })))
}
