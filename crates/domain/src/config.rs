//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_ORIGIN, SPOTIFY_ACCOUNTS_BASE_URL, SPOTIFY_API_BASE_URL,
    SPOTIFY_SCOPES, TOKENS_STORAGE_KEY, VERIFIER_STORAGE_KEY,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub spotify: SpotifyConfig,
    pub session: SessionConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Spotify application registration and endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub accounts_base_url: String,
    pub api_base_url: String,
    pub scopes: Vec<String>,
}

/// Session persistence and redirect settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Origin the redirect URI is derived from (`scheme://host[:port]`)
    pub origin: String,
    /// Location of the durable key-value store; resolved by the loader when
    /// unset
    pub storage_path: Option<PathBuf>,
    pub tokens_key: String,
    pub verifier_key: String,
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: Option<String>,
}

/// Tracing output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            accounts_base_url: SPOTIFY_ACCOUNTS_BASE_URL.to_string(),
            api_base_url: SPOTIFY_API_BASE_URL.to_string(),
            scopes: SPOTIFY_SCOPES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            storage_path: None,
            tokens_key: TOKENS_STORAGE_KEY.to_string(),
            verifier_key: VERIFIER_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS, user_agent: None }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_spotify() {
        let config = Config::default();
        assert_eq!(config.spotify.accounts_base_url, "https://accounts.spotify.com");
        assert_eq!(config.spotify.api_base_url, "https://api.spotify.com/v1");
        assert_eq!(config.spotify.scopes.len(), 11);
        assert_eq!(config.session.tokens_key, "musicTokens");
        assert_eq!(config.session.verifier_key, "musicVerifier");
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"spotify": {"client_id": "abc"}}"#).unwrap();
        assert_eq!(config.spotify.client_id, "abc");
        assert_eq!(config.spotify.scopes.len(), 11);
        assert_eq!(config.session.origin, "http://localhost:8888");
        assert_eq!(config.logging.level, "info");
    }
}
