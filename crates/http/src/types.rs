//! Wire types of the authentication service

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use turnstile_core::TokenSet;

/// Login and registration request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Refresh request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body of a login, registration or refresh response
///
/// Every field is optional: a response that parses but lacks a field is a
/// failed authentication, not a transport error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenPayload {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<String>,
    /// Account the tokens were issued for
    pub email: Option<String>,
}

/// A successful (2xx) response from a token-issuing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub status: StatusCode,
    pub payload: TokenPayload,
}

impl AuthResponse {
    /// The token set carried by this response, if it authenticates
    ///
    /// Valid iff the status is exactly 200 and all three tokens are present
    /// and non-empty.
    pub fn token_set(&self) -> Option<TokenSet> {
        if self.status != StatusCode::OK {
            return None;
        }
        let payload = &self.payload;
        TokenSet::new(
            payload.access_token.clone()?,
            payload.refresh_token.clone()?,
            payload.expires_at.clone()?,
        )
    }
}

/// Profile returned by `GET /user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: StatusCode, body: serde_json::Value) -> AuthResponse {
        AuthResponse {
            status,
            payload: serde_json::from_value(body).unwrap(),
        }
    }

    #[test]
    fn test_complete_payload_authenticates() {
        let resp = response(
            StatusCode::OK,
            json!({
                "email": "user@example.com",
                "accessToken": "a2",
                "refreshToken": "r2",
                "expiresAt": "2999-01-01T00:00:00Z"
            }),
        );
        assert_eq!(resp.token_set(), TokenSet::new("a2", "r2", "2999-01-01T00:00:00Z"));
        assert_eq!(resp.payload.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_missing_or_empty_fields_do_not_authenticate() {
        let missing = response(
            StatusCode::OK,
            json!({"accessToken": "a2", "expiresAt": "2999-01-01T00:00:00Z"}),
        );
        assert_eq!(missing.token_set(), None);

        let empty = response(
            StatusCode::OK,
            json!({"accessToken": "", "refreshToken": "r2", "expiresAt": "2999-01-01T00:00:00Z"}),
        );
        assert_eq!(empty.token_set(), None);
    }

    #[test]
    fn test_non_200_success_does_not_authenticate() {
        let created = response(
            StatusCode::CREATED,
            json!({"accessToken": "a2", "refreshToken": "r2", "expiresAt": "2999-01-01T00:00:00Z"}),
        );
        assert_eq!(created.token_set(), None);
    }

    #[test]
    fn test_wire_names() {
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: "xyz".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"refreshToken": "xyz"}));

        let body = serde_json::to_value(Credentials::new("a@b.c", "secret")).unwrap();
        assert_eq!(body, json!({"email": "a@b.c", "password": "secret"}));
    }
}
