//! API-specific error types
//!
//! Provides error classification for resource API operations.

use std::time::Duration;

use encore_common::auth::AuthError;
use encore_common::error::{ErrorClassification, ErrorSeverity};
use encore_domain::EncoreError;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Session errors (no tokens, rejected refresh) and 401/403
    Authentication,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth) and malformed responses
    Client,
    /// Network/connection errors, no status available
    Network,
}

/// Resource API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The API returned an `error` object or the request could not complete
    ///
    /// `status` is `None` when no HTTP response was received.
    /// `retry_after_secs` is the provider's `Retry-After` header, if sent.
    #[error("API request failed: {message}{}", status_suffix(.status))]
    ApiRequest { status: Option<u16>, message: String, retry_after_secs: Option<u64> },

    /// No usable access token could be obtained
    #[error(transparent)]
    Auth(#[from] AuthError),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl ApiError {
    pub fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::ApiRequest { status, message: message.into(), retry_after_secs: None }
    }

    /// Attach the delay the provider asked for; no effect on auth errors
    #[must_use]
    pub fn with_retry_after(self, secs: Option<u64>) -> Self {
        match self {
            Self::ApiRequest { status, message, .. } => {
                Self::ApiRequest { status, message, retry_after_secs: secs }
            }
            auth @ Self::Auth(_) => auth,
        }
    }

    /// HTTP status reported by the API, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiRequest { status, .. } => *status,
            Self::Auth(_) => None,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::ApiRequest { status, .. } => match status {
                None => ApiErrorCategory::Network,
                Some(401 | 403) => ApiErrorCategory::Authentication,
                Some(429) => ApiErrorCategory::RateLimit,
                Some(500..=599) => ApiErrorCategory::Server,
                Some(_) => ApiErrorCategory::Client,
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::request(err.status().map(|s| s.as_u16()), err.to_string())
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Auth(e) => e.severity(),
            Self::ApiRequest { .. } if self.is_retryable() => ErrorSeverity::Warning,
            Self::ApiRequest { .. } => ErrorSeverity::Error,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::ApiRequest { retry_after_secs, .. } => retry_after_secs.map(Duration::from_secs),
            Self::Auth(_) => None,
        }
    }
}

impl From<ApiError> for EncoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(auth) => auth.into(),
            other => Self::Api(other.to_string()),
        }
    }
}
