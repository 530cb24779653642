//! OAuth 2.0 token endpoint client
//!
//! Performs the two form-encoded grants the session needs:
//! - Authorization code exchange (with the PKCE verifier)
//! - Token refresh
//!
//! The provider reports failures in the JSON body, sometimes with a success
//! status, so the body is inspected for an `error` field regardless of the
//! HTTP status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use super::traits::OAuthClientTrait;
use super::types::{OAuthConfig, OAuthError, TokenResponse};

/// Error type for token endpoint operations
#[derive(Debug, Error)]
pub enum OAuthClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// OAuth server returned an error
    #[error("OAuth error: {0}")]
    OAuthError(OAuthError),

    /// Failed to parse response
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl OAuthClientError {
    /// Error code reported to callers (the provider's code when present)
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::OAuthError(e) => &e.error,
            Self::RequestFailed(_) => "network_error",
            Self::ParseError(_) => "invalid_response",
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<String> {
        match self {
            Self::OAuthError(e) => e.error_description.clone(),
            Self::RequestFailed(e) => Some(e.to_string()),
            Self::ParseError(msg) => Some(msg.clone()),
        }
    }
}

/// Token endpoint client for public (PKCE) OAuth clients
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a new OAuth client with the given configuration
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    ///
    /// use encore_common::auth::{OAuthClient, OAuthConfig};
    ///
    /// let config = OAuthConfig::new(
    ///     "client_id",
    ///     "https://accounts.spotify.com/authorize",
    ///     "https://accounts.spotify.com/api/token",
    ///     vec!["user-read-private".to_string()],
    /// );
    /// let client = OAuthClient::new(config, Duration::from_secs(30));
    /// ```
    #[must_use]
    pub fn new(config: OAuthConfig, timeout: Duration) -> Self {
        let builder = Client::builder().timeout(timeout);
        let builder = if std::env::var_os("ENCORE_DISABLE_PROXY").is_some() {
            builder.no_proxy()
        } else {
            builder
        };
        let client = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default HTTP client");
            Client::new()
        });

        Self { config, client }
    }

    /// Use a preconfigured `reqwest` client
    #[must_use]
    pub fn with_http_client(config: OAuthConfig, client: Client) -> Self {
        Self { config, client }
    }

    async fn request_token(
        &self,
        grant_type: &str,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse, OAuthClientError> {
        let mut form = vec![("grant_type", grant_type), ("client_id", self.config.client_id.as_str())];
        form.extend_from_slice(params);

        debug!(grant_type, url = %self.config.token_url, "requesting token");
        let response = self.client.post(&self.config.token_url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let result = parse_token_body(status, &body);
        if let Err(e) = &result {
            warn!(grant_type, status = status.as_u16(), error = %e, "token request rejected");
        }
        result
    }
}

/// Interpret a token endpoint body
///
/// Any JSON object carrying `error` is a provider error, whatever the status.
fn parse_token_body(status: StatusCode, body: &str) -> Result<TokenResponse, OAuthClientError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| OAuthClientError::ParseError(format!("HTTP {status}: {e}")))?;

    if value.get("error").is_some() {
        let error: OAuthError = serde_json::from_value(value)
            .map_err(|e| OAuthClientError::ParseError(format!("HTTP {status}: {e}")))?;
        return Err(OAuthClientError::OAuthError(error));
    }

    serde_json::from_value(value)
        .map_err(|e| OAuthClientError::ParseError(format!("HTTP {status}: {e}")))
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        self.request_token(
            "authorization_code",
            &[("code", code), ("code_verifier", code_verifier), ("redirect_uri", redirect_uri)],
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, OAuthClientError> {
        self.request_token("refresh_token", &[("refresh_token", refresh_token)]).await
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::client.
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(server: &MockServer) -> OAuthConfig {
        OAuthConfig::new(
            "client123",
            format!("{}/authorize", server.uri()),
            format!("{}/api/token", server.uri()),
            vec!["user-read-private".to_string()],
        )
    }

    /// Validates `parse_token_body` for an error object with a 200 status.
    ///
    /// Assertions:
    /// - The provider error is surfaced instead of a parse failure.
    #[test]
    fn test_error_body_with_success_status() {
        let err = parse_token_body(
            StatusCode::OK,
            r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#,
        )
        .unwrap_err();

        assert_eq!(err.code(), "invalid_grant");
        assert_eq!(err.description().as_deref(), Some("Invalid authorization code"));
    }

    #[test]
    fn test_unparsable_body() {
        let err = parse_token_body(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert_eq!(err.code(), "invalid_response");
    }

    /// Validates the authorization code grant form.
    ///
    /// Assertions:
    /// - The POST carries grant type, client id, code, verifier and redirect
    ///   URI.
    /// - The token response is parsed.
    #[tokio::test]
    async fn test_exchange_code_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("client_id=client123"))
            .and(body_string_contains("code=ABC123"))
            .and(body_string_contains("code_verifier=V"))
            .and(body_string_contains("redirect_uri=http%3A%2F%2Flocalhost%3A8888"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "A",
                "refresh_token": "R",
                "expires_in": 3600,
                "token_type": "Bearer",
                "scope": "user-read-private"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OAuthClient::new(config(&server), Duration::from_secs(5));
        let response = client.exchange_code("ABC123", "V", "http://localhost:8888").await.unwrap();

        assert_eq!(response.access_token, "A");
        assert_eq!(response.refresh_token.as_deref(), Some("R"));
        assert_eq!(response.expires_in, 3600);
    }

    /// Validates refresh error propagation for a 400 response.
    ///
    /// Assertions:
    /// - The provider code and description are preserved.
    #[tokio::test]
    async fn test_refresh_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=R"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Refresh token revoked"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OAuthClient::new(config(&server), Duration::from_secs(5));
        let err = client.refresh("R").await.unwrap_err();

        assert!(matches!(err, OAuthClientError::OAuthError(_)));
        assert_eq!(err.code(), "invalid_grant");
    }
}
