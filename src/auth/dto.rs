use serde::{Deserialize, Serialize};

use crate::users::Role;

/// Request body for local sign-up.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after register, login or refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: i64,
    pub access_token: String,
    pub refresh_token: String,
}

/// Identity attached to authenticated requests.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub role: Role,
}

/// Query half of Google's redirect back to us.
#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_uses_camel_case() {
        let json = serde_json::to_value(AuthResponse {
            id: 3,
            access_token: "a".into(),
            refresh_token: "r".into(),
        })
        .unwrap();
        assert_eq!(json["id"], 3);
        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());
    }

    #[test]
    fn register_request_accepts_camel_case_body() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com","password":"pass1234"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name, "Ada");
        assert!(req.avatar_url.is_none());
    }
}
