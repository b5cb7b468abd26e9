//! Token types.
//!
//! The single shared credential used for all authenticated Azumuta calls.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Persisted token triple.
#[derive(Clone)]
pub struct TokenState {
    /// Bearer token for authenticated calls.
    pub access_token: SecretString,
    /// Token exchanged for a new pair on refresh.
    pub refresh_token: SecretString,
    /// Raw ISO-8601 expiration as returned by Azumuta.
    pub expires_at: String,
}

impl TokenState {
    /// Creates a token state.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: impl Into<String>,
    ) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            refresh_token: SecretString::new(refresh_token.into()),
            expires_at: expires_at.into(),
        }
    }
}

impl From<RefreshTokenResponse> for TokenState {
    fn from(response: RefreshTokenResponse) -> Self {
        Self::new(response.token, response.refresh_token, response.expiration)
    }
}

impl std::fmt::Debug for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenState")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Body of `Auth/RefreshToken`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest<'a> {
    /// Current access token.
    pub jwt_token: &'a str,
    /// Current refresh token.
    pub refresh_token: &'a str,
}

impl<'a> RefreshTokenRequest<'a> {
    /// Builds the request from secrets.
    pub fn new(jwt_token: &'a SecretString, refresh_token: &'a SecretString) -> Self {
        Self {
            jwt_token: jwt_token.expose_secret(),
            refresh_token: refresh_token.expose_secret(),
        }
    }
}

/// Successful response of `Auth/RefreshToken`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    /// New access token.
    pub token: String,
    /// New expiration timestamp.
    pub expiration: String,
    /// New refresh token.
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_request_wire_names() {
        let jwt = SecretString::new("jwt-1".to_string());
        let refresh = SecretString::new("refresh-1".to_string());
        let body = serde_json::to_value(RefreshTokenRequest::new(&jwt, &refresh)).unwrap();

        assert_eq!(body["jwtToken"], "jwt-1");
        assert_eq!(body["refreshToken"], "refresh-1");
    }

    #[test]
    fn test_refresh_response_into_state() {
        let json = r#"{
            "token": "jwt-2",
            "expiration": "2026-10-16T12:00:00.1234567",
            "refreshToken": "refresh-2"
        }"#;

        let response: RefreshTokenResponse = serde_json::from_str(json).unwrap();
        let state = TokenState::from(response);
        assert_eq!(state.access_token.expose_secret(), "jwt-2");
        assert_eq!(state.refresh_token.expose_secret(), "refresh-2");
        assert_eq!(state.expires_at, "2026-10-16T12:00:00.1234567");
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let state = TokenState::new("secret-jwt", "secret-refresh", "2026-01-01T00:00:00");
        let debug_str = format!("{:?}", state);

        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret-jwt"));
        assert!(!debug_str.contains("secret-refresh"));
    }
}
