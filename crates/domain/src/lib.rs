//! # Encore Domain
//!
//! Domain types and models for Encore.
//!
//! This crate contains:
//! - Spotify resource models (profile, artists, tracks, playlists, pages)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Provider endpoints, scopes and storage key constants
//!
//! ## Architecture
//! - No dependencies on other Encore crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
