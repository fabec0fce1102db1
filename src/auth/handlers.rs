use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{AuthResponse, GoogleCallbackQuery, LoginRequest, RegisterRequest, SessionUser};
use crate::auth::extractors::{AuthUser, RefreshUser};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let session = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .auth
        .validate_credentials(&payload.email, &payload.password)
        .await?;
    let session = state.auth.login(user.id).await?;
    Ok(Json(session))
}

#[instrument(skip(state, refresh_user))]
async fn refresh(
    State(state): State<AppState>,
    refresh_user: RefreshUser,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state
        .auth
        .refresh(refresh_user.user_id, &refresh_user.token)
        .await?;
    Ok(Json(session))
}

#[instrument(skip(state))]
async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth.logout(user_id).await?;
    Ok(Json(ApiResponse::new("Logged out successfully", ())))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SessionUser>, ApiError> {
    let session_user = state.auth.validate_session_user(user_id).await?;
    Ok(Json(session_user))
}

#[instrument(skip(state))]
async fn google_login(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.google.authorize_url())
}

#[instrument(skip(state, query))]
async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<Redirect, ApiError> {
    let profile = state
        .google
        .fetch_profile(&query.code)
        .await
        .map_err(|_| ApiError::Unauthorized("Google sign-in failed".into()))?;
    let user = state.auth.provision_oauth_user(profile).await?;
    let session = state.auth.login(user.id).await?;

    let target = format!(
        "{}?accessToken={}&refreshToken={}",
        state.config.google.redirect_url,
        urlencoding::encode(&session.access_token),
        urlencoding::encode(&session.refresh_token),
    );
    Ok(Redirect::temporary(&target))
}
