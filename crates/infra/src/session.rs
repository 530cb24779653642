//! Session wiring
//!
//! Assembles a [`SessionManager`] backed by the real token endpoint client
//! and the file store, and a [`SpotifyClient`] that draws its tokens from it.

use std::sync::Arc;

use encore_common::auth::{Navigator, OAuthClient, OAuthConfig, SessionManager, TokenStore};
use encore_domain::{Config, EncoreError, Result};

use crate::config::default_storage_path;
use crate::http::HttpClient;
use crate::spotify::SpotifyClient;
use crate::storage::FileStorage;

/// Session manager used by the application
pub type SpotifySession = SessionManager<OAuthClient, FileStorage>;

/// Build a session manager from configuration
///
/// # Errors
/// Returns `EncoreError::Config` when no storage location can be resolved or
/// the HTTP client cannot be built, and `EncoreError::Storage` when the
/// storage directory cannot be created.
pub fn build_session(
    config: &Config,
    http: &HttpClient,
    navigator: Arc<dyn Navigator>,
) -> Result<SpotifySession> {
    let path = config
        .session
        .storage_path
        .clone()
        .or_else(default_storage_path)
        .ok_or_else(|| EncoreError::Config("No storage path configured".to_string()))?;

    let storage = Arc::new(FileStorage::open(path)?);
    tracing::debug!(path = %storage.path().display(), "Using file storage");
    let store = TokenStore::with_keys(
        storage,
        config.session.tokens_key.clone(),
        config.session.verifier_key.clone(),
    );

    let oauth_config = OAuthConfig::from(&config.spotify);
    let client = Arc::new(OAuthClient::with_http_client(oauth_config.clone(), http.inner().clone()));

    tracing::debug!(token_url = %oauth_config.token_url, "Session manager ready");
    Ok(SessionManager::new(oauth_config, client, store, navigator))
}

/// API client that authenticates through `session`
pub fn build_api_client(
    config: &Config,
    http: HttpClient,
    session: Arc<SpotifySession>,
) -> SpotifyClient {
    let client = SpotifyClient::from_config(&config.spotify, http, session);
    tracing::debug!(base_url = %client.base_url(), "API client ready");
    client
}
