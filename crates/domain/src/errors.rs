//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Encore
///
/// Lower layers keep their own precise error enums (auth, API); this type is
/// what configuration loading, storage backends and the application shell
/// report.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EncoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for EncoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(format!("JSON error: {err}"))
    }
}

impl From<std::io::Error> for EncoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("I/O error: {err}"))
    }
}

/// Result type alias for Encore operations
pub type Result<T> = std::result::Result<T, EncoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = EncoreError::Config("missing client id".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Config");
        assert_eq!(json["message"], "missing client id");
    }

    #[test]
    fn io_errors_map_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: EncoreError = io.into();
        assert!(matches!(err, EncoreError::Storage(ref msg) if msg.contains("denied")));
    }
}
