//! Spotify Web API access
//!
//! - [`SpotifyClient::fetch_api`]: one authenticated GET
//! - [`SpotifyClient::paginate`]: offset paging over list endpoints
//! - typed fetchers for profile, artists, tracks and playlists

pub mod auth;
pub mod client;
pub mod errors;
mod fetchers;

pub use auth::{AccessTokenProvider, StaticTokenProvider};
pub use client::SpotifyClient;
pub use errors::{ApiError, ApiErrorCategory};
