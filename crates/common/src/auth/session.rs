//! Session manager
//!
//! Orchestrates the PKCE login flow and owns the "current valid access
//! token" contract.
//!
//! # Refresh coordination
//!
//! At most one refresh grant is in flight per manager. The first caller that
//! finds an expired token installs a shared future in the pending slot;
//! later callers clone and await the same future, so every awaiter sees one
//! outcome. The future clears the slot itself once the grant settles,
//! successful or not. The slot's mutex is never held across an `.await`.
//!
//! Logout and a completed login are session boundaries: they bump the
//! session epoch and detach any in-flight refresh. A detached refresh never
//! writes to the store and settles as [`AuthError::NotAuthenticated`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};
use url::form_urlencoded;

use super::error::AuthError;
use super::pkce::{derive_challenge, generate_verifier, SystemCrypto, CHALLENGE_METHOD};
use super::redirect::redirect_uri;
use super::store::TokenStore;
use super::traits::{CryptoProvider, KeyValueStorage, Navigator, OAuthClientTrait};
use super::types::{OAuthConfig, TokenSet};
use crate::time::{Clock, SystemClock};

type RefreshFuture = Shared<BoxFuture<'static, Result<String, AuthError>>>;

/// Refresh coordination shared with in-flight refresh futures
#[derive(Default)]
struct RefreshState {
    pending: Mutex<Option<RefreshFuture>>,
    session_epoch: AtomicU64,
}

/// Error code used when freshly issued tokens cannot be persisted
const STORAGE_ERROR_CODE: &str = "storage_error";

/// PKCE session manager
///
/// Generic over the token endpoint client and the durable storage so tests
/// can script both.
pub struct SessionManager<C, S>
where
    C: OAuthClientTrait + 'static,
    S: KeyValueStorage + 'static,
{
    config: OAuthConfig,
    client: Arc<C>,
    store: TokenStore<S>,
    navigator: Arc<dyn Navigator>,
    crypto: Arc<dyn CryptoProvider>,
    clock: Arc<dyn Clock>,
    refresh: Arc<RefreshState>,
}

impl<C, S> SessionManager<C, S>
where
    C: OAuthClientTrait + 'static,
    S: KeyValueStorage + 'static,
{
    /// Create a session manager using OS randomness and the system clock
    pub fn new(
        config: OAuthConfig,
        client: Arc<C>,
        store: TokenStore<S>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            client,
            store,
            navigator,
            crypto: Arc::new(SystemCrypto),
            clock: Arc::new(SystemClock),
            refresh: Arc::new(RefreshState::default()),
        }
    }

    #[must_use]
    pub fn with_crypto(mut self, crypto: Arc<dyn CryptoProvider>) -> Self {
        self.crypto = crypto;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Token store backing this session
    pub fn store(&self) -> &TokenStore<S> {
        &self.store
    }

    /// Whether a token set with a non-empty access token is stored
    ///
    /// Does not check expiry and never touches the network.
    pub fn is_connected(&self) -> bool {
        self.store.load().is_some()
    }

    /// Build the provider authorization URL for a new login attempt
    ///
    /// Generates and persists a fresh PKCE verifier, replacing any earlier
    /// one. Does not navigate.
    ///
    /// # Errors
    /// [`AuthError::VerifierStorage`] when the verifier cannot be persisted;
    /// no URL is produced since the redirect could never be completed.
    pub fn get_auth_url(&self) -> Result<String, AuthError> {
        let verifier = generate_verifier(self.crypto.as_ref());
        self.store
            .save_verifier(&verifier)
            .map_err(|e| AuthError::VerifierStorage(e.to_string()))?;
        let challenge = derive_challenge(self.crypto.as_ref(), &verifier);

        let redirect = redirect_uri(&self.navigator.current_url());
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &redirect)
            .append_pair("scope", &self.config.scope_string())
            .append_pair("show_dialog", "false")
            .append_pair("code_challenge_method", CHALLENGE_METHOD)
            .append_pair("code_challenge", &challenge)
            .finish();

        debug!(redirect_uri = %redirect, "built authorization URL");
        Ok(format!("{}?{query}", self.config.authorize_url))
    }

    /// Complete a login if the current URL carries an authorization code
    ///
    /// Returns `Ok(false)` when there is no non-empty `code` parameter. On
    /// success the tokens are persisted as a new session (detaching any
    /// in-flight refresh), the verifier deleted and the page navigated to `/`.
    ///
    /// # Errors
    /// - [`AuthError::MissingVerifier`] when no verifier is on record
    /// - [`AuthError::AuthExchange`] when the exchange fails; nothing is
    ///   persisted
    #[instrument(skip(self))]
    pub async fn handle_redirect_if_present(&self) -> Result<bool, AuthError> {
        let current = self.navigator.current_url();
        let code = current
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());
        let Some(code) = code else {
            return Ok(false);
        };

        let verifier = self.store.take_verifier().ok_or(AuthError::MissingVerifier)?;
        let redirect = redirect_uri(&current);

        let response = self
            .client
            .exchange_code(&code, &verifier, &redirect)
            .await
            .map_err(|e| AuthError::exchange(&e))?;

        let tokens = TokenSet::from_response(response, None, self.clock.millis_since_epoch());
        self.start_session(|store| store.save(&tokens)).map_err(|e| AuthError::AuthExchange {
            code: STORAGE_ERROR_CODE.to_string(),
            description: Some(e.to_string()),
        })?;
        if let Err(e) = self.store.clear_verifier() {
            warn!(error = %e, "failed to delete consumed PKCE verifier");
        }

        self.navigator.navigate_to("/");
        info!("login complete");
        Ok(true)
    }

    /// Return an access token that is valid now, refreshing if needed
    ///
    /// Concurrent callers share a single refresh grant.
    ///
    /// # Errors
    /// - [`AuthError::NotAuthenticated`] when no tokens are stored, or the
    ///   session was logged out while the refresh was in flight
    /// - [`AuthError::TokenRefresh`] when the refresh grant fails; stored
    ///   tokens are left untouched
    pub async fn get_fresh_access_token(&self) -> Result<String, AuthError> {
        let tokens = self.store.load().ok_or(AuthError::NotAuthenticated)?;
        let now = self.clock.millis_since_epoch();
        if tokens.is_valid_at(now) {
            debug!(expires_in_ms = tokens.millis_until_expiry(now), "using stored access token");
            return Ok(tokens.access_token);
        }

        let refresh = {
            let mut pending = self.refresh.pending.lock();
            if let Some(in_flight) = pending.as_ref() {
                debug!("joining in-flight token refresh");
                in_flight.clone()
            } else {
                // Another caller may have finished a refresh since our load
                match self.store.load() {
                    Some(latest) if latest.is_valid_at(self.clock.millis_since_epoch()) => {
                        return Ok(latest.access_token);
                    }
                    Some(latest) => {
                        let epoch = self.refresh.session_epoch.load(Ordering::SeqCst);
                        let refresh = self.start_refresh(latest, epoch).shared();
                        *pending = Some(refresh.clone());
                        refresh
                    }
                    None => return Err(AuthError::NotAuthenticated),
                }
            }
        };

        refresh.await
    }

    /// Clear the stored tokens and navigate to `/`
    ///
    /// Never fails; storage errors are logged. A refresh still in flight is
    /// detached and cannot restore the cleared tokens.
    pub fn logout(&self) {
        if let Err(e) = self.start_session(TokenStore::clear) {
            warn!(error = %e, "failed to clear stored tokens");
        }
        self.navigator.navigate_to("/");
        info!("logged out");
    }

    /// Apply `update` to the store as a new session epoch
    ///
    /// Runs under the pending-slot lock, so a refresh settling concurrently
    /// either writes before `update` or observes the new epoch.
    fn start_session<R>(&self, update: impl FnOnce(&TokenStore<S>) -> R) -> R {
        let mut pending = self.refresh.pending.lock();
        self.refresh.session_epoch.fetch_add(1, Ordering::SeqCst);
        if pending.take().is_some() {
            debug!("detached in-flight token refresh");
        }
        update(&self.store)
    }

    fn start_refresh(
        &self,
        current: TokenSet,
        epoch: u64,
    ) -> BoxFuture<'static, Result<String, AuthError>> {
        let client = Arc::clone(&self.client);
        let store = self.store.clone();
        let clock = Arc::clone(&self.clock);
        let state = Arc::clone(&self.refresh);

        async move {
            info!("refreshing access token");
            let outcome = if current.refresh_token.is_empty() {
                Err(AuthError::TokenRefresh {
                    code: "invalid_grant".to_string(),
                    description: Some("no refresh token on record".to_string()),
                })
            } else {
                client.refresh(&current.refresh_token).await.map_err(|e| AuthError::refresh(&e))
            };

            let outcome = {
                let mut pending = state.pending.lock();
                if state.session_epoch.load(Ordering::SeqCst) == epoch {
                    pending.take();
                    outcome.map(|response| {
                        let tokens = TokenSet::from_response(
                            response,
                            Some(&current.refresh_token),
                            clock.millis_since_epoch(),
                        );
                        if let Err(e) = store.save(&tokens) {
                            warn!(error = %e, "failed to persist refreshed tokens");
                        }
                        tokens.access_token
                    })
                } else {
                    debug!("session ended during refresh; discarding result");
                    Err(AuthError::NotAuthenticated)
                }
            };

            match &outcome {
                Ok(_) => info!("access token refreshed"),
                Err(e) => warn!(error = %e, "access token refresh failed"),
            }
            outcome
        }
        .boxed()
    }
}
