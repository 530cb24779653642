//! Access tokens for resource API calls

use async_trait::async_trait;
use encore_common::auth::{KeyValueStorage, OAuthClientTrait, SessionManager};

use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    ///
    /// This method should handle token refresh if needed.
    async fn access_token(&self) -> Result<String, ApiError>;
}

#[async_trait]
impl<C, S> AccessTokenProvider for SessionManager<C, S>
where
    C: OAuthClientTrait + 'static,
    S: KeyValueStorage + 'static,
{
    async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.get_fresh_access_token().await?)
    }
}

/// Fixed token, for tools and tests that already hold one
#[derive(Debug, Clone)]
pub struct StaticTokenProvider(pub String);

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.0.clone())
    }
}
