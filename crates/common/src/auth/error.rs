//! Session-level authentication errors

use std::time::Duration;

use thiserror::Error;

use super::client::OAuthClientError;
use crate::error::{ErrorClassification, ErrorSeverity};

/// Errors surfaced by the public session operations
///
/// `Clone` so a single refresh outcome can be handed to every caller that
/// joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// An authorization code arrived but no PKCE verifier is on record
    #[error("authorization code received but no PKCE verifier is on record")]
    MissingVerifier,

    /// The authorization code exchange was rejected or could not complete
    #[error("authorization code exchange failed: {code}{}", describe(.description))]
    AuthExchange { code: String, description: Option<String> },

    /// The PKCE verifier for a new login could not be persisted
    #[error("failed to persist PKCE verifier: {0}")]
    VerifierStorage(String),

    /// No tokens are stored
    #[error("not authenticated")]
    NotAuthenticated,

    /// The refresh grant was rejected or could not complete
    #[error("token refresh failed: {code}{}", describe(.description))]
    TokenRefresh { code: String, description: Option<String> },
}

fn describe(description: &Option<String>) -> String {
    description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
}

impl AuthError {
    pub(crate) fn exchange(err: &OAuthClientError) -> Self {
        Self::AuthExchange { code: err.code().to_string(), description: err.description() }
    }

    pub(crate) fn refresh(err: &OAuthClientError) -> Self {
        Self::TokenRefresh { code: err.code().to_string(), description: err.description() }
    }

    /// Provider error code, when the failure came from the token endpoint
    #[must_use]
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::AuthExchange { code, .. } | Self::TokenRefresh { code, .. } => Some(code),
            Self::MissingVerifier | Self::VerifierStorage(_) | Self::NotAuthenticated => None,
        }
    }

    /// Whether the user must log in again to recover
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::TokenRefresh { .. })
    }
}

impl ErrorClassification for AuthError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotAuthenticated => ErrorSeverity::Info,
            Self::MissingVerifier => ErrorSeverity::Warning,
            Self::VerifierStorage(_) | Self::AuthExchange { .. } | Self::TokenRefresh { .. } => {
                ErrorSeverity::Error
            }
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl From<AuthError> for encore_domain::EncoreError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::OAuthError;

    #[test]
    fn provider_error_is_carried_into_refresh_error() {
        let err = OAuthClientError::OAuthError(OAuthError {
            error: "invalid_grant".to_string(),
            error_description: Some("Refresh token revoked".to_string()),
        });

        let auth = AuthError::refresh(&err);
        assert_eq!(auth.provider_code(), Some("invalid_grant"));
        assert_eq!(auth.to_string(), "token refresh failed: invalid_grant (Refresh token revoked)");
        assert!(auth.requires_login());
        assert!(!auth.is_retryable());
    }

    #[test]
    fn severity_by_variant() {
        assert_eq!(AuthError::NotAuthenticated.severity(), ErrorSeverity::Info);
        assert_eq!(AuthError::MissingVerifier.severity(), ErrorSeverity::Warning);
        assert!(!AuthError::MissingVerifier.is_critical());
        assert_eq!(AuthError::MissingVerifier.provider_code(), None);
        assert_eq!(AuthError::VerifierStorage("disk full".into()).severity(), ErrorSeverity::Error);
        assert!(!AuthError::VerifierStorage("disk full".into()).requires_login());
    }
}
