use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))
}

/// Extracts and validates an access JWT, returning the user ID.
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let keys = JwtKeys::new(&state.config.jwt);
        let claims = keys
            .verify_access(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?;
        Ok(AuthUser(claims.sub))
    }
}

/// Extracts a refresh JWT from the Authorization header.
///
/// Signature and expiry are checked here; the stored-hash comparison
/// happens afterwards in the auth service, so the raw token is kept.
pub struct RefreshUser {
    pub user_id: i64,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for RefreshUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let keys = JwtKeys::new(&state.config.jwt);
        let claims = keys
            .verify_refresh(token)
            .map_err(|_| ApiError::Unauthorized("Invalid refresh token".into()))?;
        Ok(RefreshUser {
            user_id: claims.sub,
            token: token.to_string(),
        })
    }
}
