//! OAuth 2.0 Authorization Code + PKCE session management
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  SessionManager  │  Login flow + "fresh access token" contract
//! └────────┬─────────┘
//!          │
//!          ├──► OAuthClientTrait   (token endpoint grants)
//!          ├──► TokenStore         (token set + PKCE verifier)
//!          │         │
//!          │         └──► KeyValueStorage   (durable key-value capability)
//!          ├──► Navigator          (current URL, in-app navigation)
//!          ├──► CryptoProvider     (randomness + SHA-256 for PKCE)
//!          └──► Clock              (token expiry)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use encore_common::auth::{
//!     MemoryNavigator, MemoryStorage, Navigator, OAuthClient, OAuthConfig, SessionManager,
//!     TokenStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OAuthConfig::new(
//!     "your_client_id",
//!     "https://accounts.spotify.com/authorize",
//!     "https://accounts.spotify.com/api/token",
//!     vec!["user-read-private".to_string()],
//! );
//! let client = Arc::new(OAuthClient::new(config.clone(), Duration::from_secs(30)));
//! let store = TokenStore::new(Arc::new(MemoryStorage::new()));
//! let navigator: Arc<dyn Navigator> =
//!     Arc::new(MemoryNavigator::new("http://localhost:8888/".parse()?));
//!
//! let session = SessionManager::new(config, client, store, navigator);
//! if !session.is_connected() {
//!     println!("Open {}", session.get_auth_url()?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod navigator;
pub mod pkce;
pub mod redirect;
pub mod session;
pub mod storage;
pub mod store;
pub mod traits;
pub mod types;

// Re-export main types for convenience
pub use client::{OAuthClient, OAuthClientError};
pub use error::AuthError;
pub use navigator::MemoryNavigator;
pub use pkce::{derive_challenge, generate_verifier, SystemCrypto};
pub use redirect::redirect_uri;
pub use session::SessionManager;
pub use storage::{MemoryStorage, StorageError};
pub use store::TokenStore;
pub use traits::{CryptoProvider, KeyValueStorage, Navigator, OAuthClientTrait};
pub use types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};
