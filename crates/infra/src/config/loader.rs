//! Configuration loader
//!
//! Loads application configuration from a file and environment variables.
//!
//! ## Loading Strategy
//! 1. Start from an explicit file, or the first file found by
//!    [`probe_config_paths`], or built-in defaults when none exists
//! 2. Apply environment variable overrides on top
//! 3. Resolve the storage path under the user config directory if unset
//!
//! JSON and TOML are both supported (detected by file extension).
//!
//! ## Environment Variables
//! - `ENCORE_CLIENT_ID`: Spotify application client id
//! - `ENCORE_ORIGIN`: Origin the redirect URI is derived from
//! - `ENCORE_STORAGE_PATH`: Durable key-value store file
//! - `ENCORE_ACCOUNTS_URL`: Accounts service base URL
//! - `ENCORE_API_URL`: Resource API base URL
//! - `ENCORE_HTTP_TIMEOUT`: Request timeout in seconds
//! - `ENCORE_LOG_LEVEL`: Default tracing level
//! - `ENCORE_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./encore.json` or `./encore.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `<user config dir>/encore/config.{json,toml}`

use std::path::{Path, PathBuf};

use encore_domain::{Config, EncoreError, Result};
use url::Url;

use crate::errors::InfraError;

const APP_DIR: &str = "encore";
const STORAGE_FILE: &str = "storage.json";

/// Load configuration with the full fallback strategy
///
/// # Errors
/// Returns `EncoreError::Config` if:
/// - An explicitly requested file does not exist
/// - A file or environment value is invalid
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_from_file(Some(path))?,
        None => match probe_config_paths() {
            Some(found) => load_from_file(Some(found))?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    if config.session.storage_path.is_none() {
        config.session.storage_path = default_storage_path();
    }
    validate(&config)?;

    tracing::info!(
        origin = %config.session.origin,
        client_id_set = !config.spotify.client_id.is_empty(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
///
/// # Errors
/// Returns `EncoreError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EncoreError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            EncoreError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EncoreError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Apply `ENCORE_*` environment variables on top of `config`
///
/// # Errors
/// Returns `EncoreError::Config` when a numeric variable cannot be parsed.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(client_id) = env_opt("ENCORE_CLIENT_ID") {
        config.spotify.client_id = client_id;
    }
    if let Some(origin) = env_opt("ENCORE_ORIGIN") {
        config.session.origin = origin;
    }
    if let Some(path) = env_opt("ENCORE_STORAGE_PATH") {
        config.session.storage_path = Some(PathBuf::from(path));
    }
    if let Some(url) = env_opt("ENCORE_ACCOUNTS_URL") {
        config.spotify.accounts_base_url = url;
    }
    if let Some(url) = env_opt("ENCORE_API_URL") {
        config.spotify.api_base_url = url;
    }
    if let Some(timeout) = env_opt("ENCORE_HTTP_TIMEOUT") {
        config.http.timeout_seconds = timeout
            .parse::<u64>()
            .map_err(|e| EncoreError::Config(format!("Invalid HTTP timeout: {}", e)))?;
    }
    if let Some(level) = env_opt("ENCORE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("ENCORE_LOG_JSON", config.logging.json);
    Ok(())
}

/// Default location of the durable key-value store
pub fn default_storage_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(STORAGE_FILE))
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `EncoreError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| EncoreError::from(InfraError::from(e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EncoreError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(EncoreError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn validate(config: &Config) -> Result<()> {
    let origin = Url::parse(&config.session.origin)
        .map_err(|e| EncoreError::Config(format!("Invalid origin {}: {}", config.session.origin, e)))?;
    if !origin.has_host() {
        return Err(EncoreError::Config(format!("Origin has no host: {}", config.session.origin)));
    }
    if config.http.timeout_seconds == 0 {
        return Err(EncoreError::Config("HTTP timeout must be positive".to_string()));
    }
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("encore.json"),
            cwd.join("encore.toml"),
            cwd.join("config.json"),
            cwd.join("config.toml"),
        ]);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join(APP_DIR);
        candidates.extend(vec![app_dir.join("config.json"), app_dir.join("config.toml")]);
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_KEYS: [&str; 8] = [
        "ENCORE_CLIENT_ID",
        "ENCORE_ORIGIN",
        "ENCORE_STORAGE_PATH",
        "ENCORE_ACCOUNTS_URL",
        "ENCORE_API_URL",
        "ENCORE_HTTP_TIMEOUT",
        "ENCORE_LOG_LEVEL",
        "ENCORE_LOG_JSON",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_ENCORE_BOOL_YES", "YES");
        std::env::set_var("TEST_ENCORE_BOOL_OFF", "off");
        std::env::remove_var("TEST_ENCORE_BOOL_MISSING");

        assert!(env_bool("TEST_ENCORE_BOOL_YES", false));
        assert!(!env_bool("TEST_ENCORE_BOOL_OFF", true));
        assert!(env_bool("TEST_ENCORE_BOOL_MISSING", true));

        std::env::remove_var("TEST_ENCORE_BOOL_YES");
        std::env::remove_var("TEST_ENCORE_BOOL_OFF");
    }

    #[test]
    fn test_load_from_file_toml() {
        let file = temp_config(
            ".toml",
            r#"
            [spotify]
            client_id = "from-toml"

            [session]
            origin = "http://127.0.0.1:3000"

            [logging]
            level = "debug"
            "#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.spotify.client_id, "from-toml");
        assert_eq!(config.session.origin, "http://127.0.0.1:3000");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn test_load_from_file_json() {
        let file = temp_config(".json", r#"{"http": {"timeout_seconds": 5}}"#);

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.http.timeout_seconds, 5);
        assert_eq!(config.session.tokens_key, "musicTokens");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let file = temp_config(".toml", "spotify = [");
        let err = load_from_file(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, EncoreError::Config(_)));

        let missing = load_from_file(Some(PathBuf::from("/nonexistent/encore.toml"))).unwrap_err();
        assert!(matches!(missing, EncoreError::Config(msg) if msg.contains("not found")));
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let file = temp_config(".json", r#"{"spotify": {"client_id": "from-file"}}"#);
        std::env::set_var("ENCORE_CLIENT_ID", "from-env");
        std::env::set_var("ENCORE_STORAGE_PATH", "/tmp/encore-test/storage.json");
        std::env::set_var("ENCORE_LOG_JSON", "true");

        let config = load(Some(file.path().to_path_buf())).unwrap();
        clear_env();

        assert_eq!(config.spotify.client_id, "from-env");
        assert_eq!(
            config.session.storage_path,
            Some(PathBuf::from("/tmp/encore-test/storage.json"))
        );
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_env_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let file = temp_config(".json", "{}");
        std::env::set_var("ENCORE_HTTP_TIMEOUT", "soon");
        let timeout = load(Some(file.path().to_path_buf()));
        clear_env();
        assert!(matches!(timeout, Err(EncoreError::Config(_))));

        std::env::set_var("ENCORE_ORIGIN", "not a url");
        let origin = load(Some(file.path().to_path_buf()));
        clear_env();
        assert!(matches!(origin, Err(EncoreError::Config(_))));
    }

    #[test]
    fn test_default_storage_path_is_resolved() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let file = temp_config(".json", "{}");
        let config = load(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.session.storage_path, default_storage_path());
    }
}
