//! # Encore Infrastructure
//!
//! Concrete implementations behind the session and API layers.
//!
//! This crate contains:
//! - Configuration loading (file + `ENCORE_*` environment overrides)
//! - File-backed durable key-value storage
//! - HTTP client construction
//! - The Spotify resource API client and its pagination
//! - Tracing initialisation
//!
//! ## Architecture
//! - Implements capabilities defined in `encore-common`
//! - Depends on `encore-domain` for configuration and models
//! - Contains all "impure" code (filesystem, network)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod session;
pub mod spotify;
pub mod storage;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
pub use session::{build_api_client, build_session, SpotifySession};
pub use spotify::{AccessTokenProvider, ApiError, SpotifyClient, StaticTokenProvider};
pub use storage::FileStorage;
