//! Capabilities injected into the session layer
//!
//! These traits abstract the external dependencies of the session manager
//! (token endpoint, durable storage, page location, randomness and hashing)
//! so each can be swapped for an in-memory or scripted implementation.

use async_trait::async_trait;
use url::Url;

use super::client::OAuthClientError;
use super::storage::StorageError;
use super::types::TokenResponse;

/// Trait for token endpoint operations
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Exchange an authorization code for tokens
    /// (`grant_type=authorization_code`)
    ///
    /// # Errors
    /// Returns error if the request fails or the provider rejects the code
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, OAuthClientError>;

    /// Obtain a new access token (`grant_type=refresh_token`)
    ///
    /// # Errors
    /// Returns error if the request fails or the token is invalid/revoked
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, OAuthClientError>;
}

/// Durable string key-value storage
///
/// Each `set`/`remove` must be atomic per key: readers observe either the
/// old or the new value, never a partial write.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Errors
    /// Returns error if the backing store cannot be read
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns error if the backing store cannot be written
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key succeeds
    ///
    /// # Errors
    /// Returns error if the backing store cannot be written
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Current page location and in-app navigation
pub trait Navigator: Send + Sync {
    /// Absolute URL of the current location
    fn current_url(&self) -> Url;

    /// Replace the current location with `path` on the same origin
    fn navigate_to(&self, path: &str);
}

/// Source of randomness and SHA-256 digests
pub trait CryptoProvider: Send + Sync {
    /// `len` cryptographically secure random bytes
    fn random_bytes(&self, len: usize) -> Vec<u8>;

    /// SHA-256 digest of `data`
    fn sha256(&self, data: &[u8]) -> [u8; 32];
}
