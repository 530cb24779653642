//! Application constants
//!
//! Centralized location for provider endpoints, requested scopes and the
//! durable storage keys shared by the session layer.

// Provider endpoints
pub const SPOTIFY_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";
pub const SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const AUTHORIZE_PATH: &str = "/authorize";
pub const TOKEN_PATH: &str = "/api/token";

/// Scopes requested on every login.
pub const SPOTIFY_SCOPES: [&str; 11] = [
    "user-read-playback-state",
    "user-read-currently-playing",
    "user-read-private",
    "user-follow-read",
    "user-library-read",
    "user-read-playback-position",
    "user-read-email",
    "user-top-read",
    "user-read-recently-played",
    "playlist-read-collaborative",
    "playlist-read-private",
];

// Durable storage keys
pub const TOKENS_STORAGE_KEY: &str = "musicTokens";
pub const VERIFIER_STORAGE_KEY: &str = "musicVerifier";

// Default local origin (must match the redirect URI registered with Spotify)
pub const DEFAULT_ORIGIN: &str = "http://localhost:8888";

// Page sizes
pub const PAGED_LIST_LIMIT: u32 = 50;
pub const TOP_ITEMS_LIMIT: u32 = 10;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
