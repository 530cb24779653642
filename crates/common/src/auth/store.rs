//! Durable token and verifier persistence
//!
//! The token set lives under one key as a single JSON record, so it is
//! always replaced as a unit. The PKCE verifier lives under its own key.

use std::sync::Arc;

use encore_domain::constants::{TOKENS_STORAGE_KEY, VERIFIER_STORAGE_KEY};
use tracing::{debug, warn};

use super::storage::StorageError;
use super::traits::KeyValueStorage;
use super::types::TokenSet;

/// Token store over an injected key-value storage
pub struct TokenStore<S: KeyValueStorage> {
    storage: Arc<S>,
    tokens_key: String,
    verifier_key: String,
}

impl<S: KeyValueStorage> Clone for TokenStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            tokens_key: self.tokens_key.clone(),
            verifier_key: self.verifier_key.clone(),
        }
    }
}

impl<S: KeyValueStorage> TokenStore<S> {
    /// Create a store using the default `musicTokens`/`musicVerifier` keys
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_keys(storage, TOKENS_STORAGE_KEY, VERIFIER_STORAGE_KEY)
    }

    pub fn with_keys(
        storage: Arc<S>,
        tokens_key: impl Into<String>,
        verifier_key: impl Into<String>,
    ) -> Self {
        Self { storage, tokens_key: tokens_key.into(), verifier_key: verifier_key.into() }
    }

    /// Load the stored token set
    ///
    /// Returns `None` when the record is absent, unreadable, unparsable or
    /// has an empty access token.
    pub fn load(&self) -> Option<TokenSet> {
        let raw = match self.storage.get(&self.tokens_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read token record");
                return None;
            }
        };

        match serde_json::from_str::<TokenSet>(&raw) {
            Ok(tokens) if !tokens.access_token.is_empty() => Some(tokens),
            Ok(_) => {
                debug!("token record has no access token");
                None
            }
            Err(e) => {
                debug!(error = %e, "ignoring unparsable token record");
                None
            }
        }
    }

    /// Overwrite the token record
    ///
    /// # Errors
    /// Returns error if the record cannot be written
    pub fn save(&self, tokens: &TokenSet) -> Result<(), StorageError> {
        let raw = serde_json::to_string(tokens)?;
        self.storage.set(&self.tokens_key, &raw)
    }

    /// Remove the token record
    ///
    /// # Errors
    /// Returns error if the record cannot be removed
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.tokens_key)
    }

    /// Persist the PKCE verifier, replacing any previous one
    ///
    /// # Errors
    /// Returns error if the verifier cannot be written
    pub fn save_verifier(&self, verifier: &str) -> Result<(), StorageError> {
        self.storage.set(&self.verifier_key, verifier)
    }

    /// Read the PKCE verifier without removing it
    ///
    /// Empty or unreadable values count as absent.
    pub fn take_verifier(&self) -> Option<String> {
        match self.storage.get(&self.verifier_key) {
            Ok(Some(verifier)) if !verifier.is_empty() => Some(verifier),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "failed to read PKCE verifier");
                None
            }
        }
    }

    /// Delete the PKCE verifier once it has been consumed
    ///
    /// # Errors
    /// Returns error if the verifier cannot be removed
    pub fn clear_verifier(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.verifier_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, TokenStore<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (Arc::clone(&storage), TokenStore::new(storage))
    }

    fn tokens() -> TokenSet {
        TokenSet {
            access_token: "A".to_string(),
            refresh_token: "R".to_string(),
            expires_at_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn save_then_load_returns_same_tokens() {
        let (storage, store) = store();
        store.save(&tokens()).unwrap();

        assert_eq!(store.load(), Some(tokens()));
        assert!(storage.get(TOKENS_STORAGE_KEY).unwrap().unwrap().contains("\"expires\""));
    }

    #[test]
    fn load_ignores_garbage_and_empty_access_token() {
        let (storage, store) = store();
        assert_eq!(store.load(), None);

        storage.set(TOKENS_STORAGE_KEY, "not json").unwrap();
        assert_eq!(store.load(), None);

        storage
            .set(TOKENS_STORAGE_KEY, r#"{"accessToken":"","refreshToken":"R","expires":1}"#)
            .unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn load_defaults_missing_expiry_to_zero() {
        let (storage, store) = store();
        storage.set(TOKENS_STORAGE_KEY, r#"{"accessToken":"A","refreshToken":"R"}"#).unwrap();

        assert_eq!(store.load().map(|t| t.expires_at_ms), Some(0));
    }

    #[test]
    fn clear_removes_record() {
        let (_, store) = store();
        store.save(&tokens()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn verifier_is_peeked_until_cleared() {
        let (_, store) = store();
        assert_eq!(store.take_verifier(), None);

        store.save_verifier("first").unwrap();
        store.save_verifier("second").unwrap();
        assert_eq!(store.take_verifier().as_deref(), Some("second"));
        assert_eq!(store.take_verifier().as_deref(), Some("second"));

        store.clear_verifier().unwrap();
        assert_eq!(store.take_verifier(), None);
    }

    #[test]
    fn custom_keys_are_honoured() {
        let storage = Arc::new(MemoryStorage::new());
        let store = TokenStore::with_keys(Arc::clone(&storage), "tok", "ver");
        store.save_verifier("V").unwrap();

        assert_eq!(storage.get("ver").unwrap().as_deref(), Some("V"));
        assert_eq!(storage.get(VERIFIER_STORAGE_KEY).unwrap(), None);
    }
}
