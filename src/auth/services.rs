use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::dto::{AuthResponse, RegisterRequest, SessionUser};
use crate::auth::google::GoogleProfile;
use crate::auth::hashing::{hash_secret, verify_secret};
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;
use crate::users::{NewUser, User, UserStore};

/// One message for both unknown email and bad password, so the error
/// cannot be used to probe which emails are registered.
const WRONG_CREDENTIALS: &str = "Wrong Email or Password";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// At least 8 characters, with at least one letter and one digit.
pub(crate) fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Coordinates credential validation, OAuth provisioning and the
/// login/refresh/logout session transitions.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    /// Local sign-up: validates, creates the user, starts a session.
    pub async fn register(&self, mut req: RegisterRequest) -> Result<AuthResponse, ApiError> {
        req.email = req.email.trim().to_lowercase();

        if !is_valid_email(&req.email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
        if !is_valid_password(&req.password) {
            return Err(ApiError::Validation(
                "Password must be at least 8 characters long and contain at least one letter and one number".into(),
            ));
        }
        if self.users.find_by_email(&req.email).await?.is_some() {
            warn!(email = %req.email, "email already registered");
            return Err(ApiError::Conflict("Email already registered".into()));
        }

        let password_hash = hash_secret(&req.password)?;
        let user = self
            .users
            .create(NewUser {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password_hash,
                avatar_url: req.avatar_url,
                from_google: false,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        self.login(user.id).await
    }

    /// Looks up the user by email and checks the password. Both failure
    /// halves produce the identical Unauthorized message.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let email = email.trim().to_lowercase();
        let user = match self.users.find_by_email(&email).await? {
            Some(u) => u,
            None => {
                warn!(email = %email, "login unknown email");
                return Err(ApiError::Unauthorized(WRONG_CREDENTIALS.into()));
            }
        };

        // OAuth-provisioned users have no local password.
        if user.password_hash.is_empty() || !verify_secret(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(ApiError::Unauthorized(WRONG_CREDENTIALS.into()));
        }

        Ok(user)
    }

    /// Issues a token pair and persists the refresh-token hash,
    /// overwriting (and thereby invalidating) any prior session.
    pub async fn login(&self, user_id: i64) -> Result<AuthResponse, ApiError> {
        let pair = self.keys.sign_pair(user_id)?;
        let refresh_hash = hash_secret(&pair.refresh_token)?;
        self.users
            .set_refresh_token_hash(user_id, Some(&refresh_hash))
            .await?;
        info!(user_id = %user_id, "session started");
        Ok(AuthResponse {
            id: user_id,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Checks a presented refresh token against the stored hash.
    /// Fails when no session is active or the token does not match.
    pub async fn verify_refresh_token(
        &self,
        user_id: i64,
        presented: &str,
    ) -> Result<(), ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".into()))?;

        let stored = user
            .refresh_token_hash
            .as_deref()
            .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".into()))?;

        if !verify_secret(presented, stored)? {
            warn!(user_id = %user_id, "refresh token does not match stored hash");
            return Err(ApiError::Unauthorized("Invalid refresh token".into()));
        }
        Ok(())
    }

    /// Verifies the presented refresh token, then rotates: a new pair is
    /// issued and the stored hash overwritten, so the presented token
    /// cannot be used a second time.
    pub async fn refresh(&self, user_id: i64, presented: &str) -> Result<AuthResponse, ApiError> {
        self.verify_refresh_token(user_id, presented).await?;
        info!(user_id = %user_id, "refresh token rotated");
        self.login(user_id).await
    }

    /// Ends the session server-side regardless of any still-valid tokens.
    pub async fn logout(&self, user_id: i64) -> Result<(), ApiError> {
        self.users.set_refresh_token_hash(user_id, None).await?;
        info!(user_id = %user_id, "session ended");
        Ok(())
    }

    /// Attaches identity to authenticated requests; fails when the user
    /// was deleted after the token was issued.
    pub async fn validate_session_user(&self, user_id: i64) -> Result<SessionUser, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;
        Ok(SessionUser {
            id: user.id,
            role: user.role,
        })
    }

    /// Finds or creates the local record for a Google profile.
    /// Idempotent: repeated calls with one email return the same user.
    pub async fn provision_oauth_user(&self, profile: GoogleProfile) -> Result<User, ApiError> {
        let email = profile.email.trim().to_lowercase();
        if let Some(user) = self.users.find_by_email(&email).await? {
            return Ok(user);
        }

        let user = self
            .users
            .create(NewUser {
                first_name: profile.first_name,
                last_name: profile.last_name,
                email,
                password_hash: String::new(),
                avatar_url: profile.avatar_url,
                from_google: true,
            })
            .await?;
        info!(user_id = %user.id, email = %user.email, "oauth user provisioned");
        Ok(user)
    }
}
