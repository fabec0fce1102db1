use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::config::GoogleConfig;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Profile fields we keep from Google's userinfo response.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    #[serde(default, rename = "given_name")]
    pub first_name: String,
    #[serde(default, rename = "family_name")]
    pub last_name: String,
    #[serde(default, rename = "picture")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google OAuth 2.0 authorization-code flow client.
#[derive(Clone)]
pub struct GoogleOAuth {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleOAuth {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Consent-screen URL the login endpoint redirects to.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
            AUTH_ENDPOINT,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.callback_url),
            urlencoding::encode("openid email profile"),
        )
    }

    /// Exchanges the authorization code for an access token, then
    /// fetches the user's profile with it.
    pub async fn fetch_profile(&self, code: &str) -> anyhow::Result<GoogleProfile> {
        let token: TokenResponse = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("google token exchange request")?
            .error_for_status()
            .context("google token exchange rejected")?
            .json()
            .await
            .context("google token exchange body")?;

        let profile: GoogleProfile = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .context("google userinfo request")?
            .error_for_status()
            .context("google userinfo rejected")?
            .json()
            .await
            .context("google userinfo body")?;

        debug!(email = %profile.email, "google profile fetched");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_client_and_scopes() {
        let oauth = GoogleOAuth::new(GoogleConfig {
            client_id: "client-123".into(),
            client_secret: "shh".into(),
            callback_url: "http://localhost:8080/auth/google/callback".into(),
            redirect_url: "http://localhost:3000/oauth".into(),
        });
        let url = oauth.authorize_url();
        assert!(url.starts_with(AUTH_ENDPOINT));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("openid%20email%20profile"));
        assert!(!url.contains("shh"));
    }

    #[test]
    fn profile_deserializes_from_userinfo_shape() {
        let profile: GoogleProfile = serde_json::from_str(
            r#"{"email":"ada@example.com","given_name":"Ada","family_name":"Lovelace","picture":"https://lh3.example/p.jpg","id":"1"}"#,
        )
        .unwrap();
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.avatar_url.as_deref(), Some("https://lh3.example/p.jpg"));
    }
}
