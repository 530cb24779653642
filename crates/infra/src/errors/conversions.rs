//! Conversions from external infrastructure errors into domain errors.

use encore_domain::EncoreError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EncoreError);

impl From<InfraError> for EncoreError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EncoreError> for InfraError {
    fn from(value: EncoreError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoEncoreError {
    fn into_encore(self) -> EncoreError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EncoreError */
/* -------------------------------------------------------------------------- */

impl IntoEncoreError for HttpError {
    fn into_encore(self) -> EncoreError {
        if self.is_timeout() {
            return EncoreError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return EncoreError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return EncoreError::Config(format!("invalid HTTP client configuration: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => EncoreError::Auth(message),
                400..=499 => EncoreError::InvalidInput(message),
                _ => EncoreError::Network(message),
            };
        }

        EncoreError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_encore())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → EncoreError */
/* -------------------------------------------------------------------------- */

impl IntoEncoreError for toml::de::Error {
    fn into_encore(self) -> EncoreError {
        EncoreError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_encore())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
