//! Bearer-token authentication extractor

use crate::error::ApiError;
use crate::state::ApiState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;
use wayfind_core::types::User;
use wayfind_core::WayfindError;

/// The authenticated account behind an `Authorization: Bearer` header.
///
/// Resolves the token to a subject email and loads the account; any
/// failure along the way maps to 401.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<ApiState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| WayfindError::auth("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| WayfindError::auth("Authorization header is not a bearer token"))?;

        let email = state.tokens.resolve(token).map_err(|e| {
            warn!("Token rejected: {}", e);
            e
        })?;

        let user = state
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| WayfindError::auth("User not found"))?;

        Ok(AuthUser(user))
    }
}
