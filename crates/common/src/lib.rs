//! Shared session and OAuth infrastructure for Encore crates.
//!
//! # Modules
//!
//! - [`auth`]: OAuth 2.0 Authorization Code + PKCE session management
//! - [`error`]: error classification shared by every layer
//! - [`time`]: wall-clock abstraction used for token expiry
//! - `testing`: mock capabilities (enable the `test-utils` feature)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod error;
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{AuthError, SessionManager, TokenSet};
pub use error::{ErrorClassification, ErrorSeverity};
pub use time::{Clock, SystemClock};
