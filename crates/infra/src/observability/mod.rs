//! Tracing initialisation
//!
//! Installs a `tracing-subscriber` formatter filtered by `RUST_LOG`, falling
//! back to the configured level. Output goes to stderr so command output on
//! stdout stays machine-readable.

use encore_domain::{EncoreError, LoggingConfig, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set, otherwise the configured level
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            EncoreError::Config(format!("Invalid log level {:?}: {}", config.level, e))
        }),
    }
}

/// Install the global subscriber
///
/// # Errors
/// Returns `EncoreError::Config` for an invalid level and
/// `EncoreError::Internal` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)).try_init()
    };

    installed.map_err(|e| EncoreError::Internal(format!("Failed to install tracing: {}", e)))
}
