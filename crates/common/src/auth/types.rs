//! OAuth 2.0 types and structures
//!
//! Defines the persisted token record, the token endpoint's wire formats and
//! the authorization server configuration.

use std::fmt;

use encore_domain::constants::{AUTHORIZE_PATH, TOKEN_PATH};
use encore_domain::SpotifyConfig;
use serde::{Deserialize, Serialize};

/// OAuth 2.0 access and refresh tokens with absolute expiry
///
/// Persisted as one JSON record:
/// `{"accessToken": "...", "refreshToken": "...", "expires": <epoch ms>}`.
/// Always written and replaced as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSet {
    /// Bearer token for resource API calls
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    #[serde(default)]
    pub refresh_token: String,

    /// Absolute expiry in milliseconds since the UNIX epoch
    #[serde(rename = "expires", default)]
    pub expires_at_ms: i64,
}

impl TokenSet {
    /// Build a token set from a token endpoint response received at `now_ms`
    ///
    /// When the provider omits a refresh token, `previous_refresh_token` is
    /// retained.
    #[must_use]
    pub fn from_response(
        response: TokenResponse,
        previous_refresh_token: Option<&str>,
        now_ms: i64,
    ) -> Self {
        let refresh_token = match response.refresh_token {
            Some(token) if !token.is_empty() => token,
            _ => previous_refresh_token.unwrap_or_default().to_string(),
        };

        Self {
            access_token: response.access_token,
            refresh_token,
            expires_at_ms: now_ms.saturating_add(response.expires_in.saturating_mul(1000)),
        }
    }

    /// Check if the access token is still usable at `now_ms`
    #[must_use]
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms
    }

    /// Milliseconds until expiry at `now_ms` (negative once expired)
    #[must_use]
    pub fn millis_until_expiry(&self, now_ms: i64) -> i64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }
}

/// OAuth token response from authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// OAuth error response from authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{} ({desc})", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}

/// OAuth configuration for the authorization server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    /// Public PKCE client identifier
    pub client_id: String,

    /// Full authorization endpoint URL
    pub authorize_url: String,

    /// Full token endpoint URL
    pub token_url: String,

    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Create a new OAuth configuration
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            authorize_url: authorize_url.into(),
            token_url: token_url.into(),
            scopes,
        }
    }

    /// Get scopes as space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

impl From<&SpotifyConfig> for OAuthConfig {
    fn from(config: &SpotifyConfig) -> Self {
        let accounts = config.accounts_base_url.trim_end_matches('/');
        Self::new(
            config.client_id.clone(),
            format!("{accounts}{AUTHORIZE_PATH}"),
            format!("{accounts}{TOKEN_PATH}"),
            config.scopes.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::types.
    use super::*;

    fn response(refresh_token: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "A2".to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expires_in: 3600,
            token_type: Some("Bearer".to_string()),
            scope: None,
        }
    }

    /// Validates the persisted JSON shape of `TokenSet`.
    ///
    /// Assertions:
    /// - Field names are `accessToken`, `refreshToken` and `expires`.
    /// - The record parses back into an equal value.
    #[test]
    fn test_token_set_storage_shape() {
        let tokens = TokenSet {
            access_token: "A".to_string(),
            refresh_token: "R".to_string(),
            expires_at_ms: 1_700_000_000_000,
        };

        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"accessToken": "A", "refreshToken": "R", "expires": 1_700_000_000_000_i64})
        );

        let parsed: TokenSet = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, tokens);
    }

    /// Validates `TokenSet::from_response` for a response carrying a new
    /// refresh token.
    ///
    /// Assertions:
    /// - The new refresh token replaces the previous one.
    /// - Expiry is `now + expires_in * 1000`.
    #[test]
    fn test_from_response_replaces_refresh_token() {
        let tokens = TokenSet::from_response(response(Some("R2")), Some("R"), 1_000);

        assert_eq!(tokens.access_token, "A2");
        assert_eq!(tokens.refresh_token, "R2");
        assert_eq!(tokens.expires_at_ms, 3_601_000);
    }

    /// Validates `TokenSet::from_response` when the provider omits the
    /// refresh token.
    ///
    /// Assertions:
    /// - The previous refresh token is retained.
    #[test]
    fn test_from_response_retains_previous_refresh_token() {
        let tokens = TokenSet::from_response(response(None), Some("R"), 0);
        assert_eq!(tokens.refresh_token, "R");
    }

    /// Validates `TokenSet::is_valid_at` at the expiry boundary.
    ///
    /// Assertions:
    /// - Valid strictly before expiry, invalid at and after it.
    #[test]
    fn test_validity_boundary() {
        let tokens = TokenSet {
            access_token: "A".to_string(),
            refresh_token: "R".to_string(),
            expires_at_ms: 5_000,
        };

        assert!(tokens.is_valid_at(4_999));
        assert!(!tokens.is_valid_at(5_000));
        assert_eq!(tokens.millis_until_expiry(6_000), -1_000);
    }

    #[test]
    fn test_oauth_error_display() {
        let error = OAuthError {
            error: "invalid_grant".to_string(),
            error_description: Some("Refresh token revoked".to_string()),
        };
        assert_eq!(error.to_string(), "invalid_grant (Refresh token revoked)");
    }

    /// Validates `OAuthConfig` derivation from the Spotify configuration.
    ///
    /// Assertions:
    /// - Endpoint URLs are joined onto the accounts base URL.
    /// - Scopes are joined with single spaces.
    #[test]
    fn test_oauth_config_from_spotify_config() {
        let spotify = SpotifyConfig {
            client_id: "client".to_string(),
            accounts_base_url: "http://127.0.0.1:9000/".to_string(),
            scopes: vec!["user-read-private".to_string(), "user-top-read".to_string()],
            ..SpotifyConfig::default()
        };

        let config = OAuthConfig::from(&spotify);
        assert_eq!(config.authorize_url, "http://127.0.0.1:9000/authorize");
        assert_eq!(config.token_url, "http://127.0.0.1:9000/api/token");
        assert_eq!(config.scope_string(), "user-read-private user-top-read");
    }
}
