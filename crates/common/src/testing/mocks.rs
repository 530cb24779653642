//! Mock implementations of the session capabilities

// Allow missing error/panic docs for test mocks - they are designed to be simple
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tokio::sync::Semaphore;

use crate::auth::{CryptoProvider, OAuthClientError, OAuthClientTrait, OAuthError, TokenResponse};

type Scripted = Result<TokenResponse, OAuthError>;

/// Mock OAuth client that replays scripted token endpoint responses
///
/// Responses are consumed in order; an exhausted script fails with
/// `OAuthClientError::ParseError`. A gated client blocks every refresh until
/// [`MockOAuthClient::release`] is called, which lets tests hold a refresh
/// in flight while other callers pile up behind it.
#[derive(Debug, Default)]
pub struct MockOAuthClient {
    exchange_responses: Mutex<VecDeque<Scripted>>,
    refresh_responses: Mutex<VecDeque<Scripted>>,
    exchange_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    last_exchange: Mutex<Option<(String, String, String)>>,
    last_refresh_token: Mutex<Option<String>>,
    gate: Option<Arc<Semaphore>>,
}

fn ok_response(access_token: &str, refresh_token: Option<&str>, expires_in: i64) -> Scripted {
    Ok(TokenResponse {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.map(str::to_string),
        expires_in,
        token_type: Some("Bearer".to_string()),
        scope: None,
    })
}

fn err_response(code: &str, description: &str) -> Scripted {
    Err(OAuthError { error: code.to_string(), error_description: Some(description.to_string()) })
}

impl MockOAuthClient {
    /// Create a new mock OAuth client with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client whose refresh calls wait for [`Self::release`].
    pub fn gated() -> Self {
        Self { gate: Some(Arc::new(Semaphore::new(0))), ..Self::default() }
    }

    /// Let `permits` blocked refresh calls proceed.
    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn push_exchange_ok(&self, access_token: &str, refresh_token: Option<&str>, expires_in: i64) {
        self.exchange_responses.lock().push_back(ok_response(access_token, refresh_token, expires_in));
    }

    pub fn push_exchange_err(&self, code: &str, description: &str) {
        self.exchange_responses.lock().push_back(err_response(code, description));
    }

    pub fn push_refresh_ok(&self, access_token: &str, refresh_token: Option<&str>, expires_in: i64) {
        self.refresh_responses.lock().push_back(ok_response(access_token, refresh_token, expires_in));
    }

    pub fn push_refresh_err(&self, code: &str, description: &str) {
        self.refresh_responses.lock().push_back(err_response(code, description));
    }

    /// Number of `exchange_code` calls so far.
    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    /// Number of `refresh` calls so far, counted before the gate.
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// `(code, verifier, redirect_uri)` of the last exchange.
    pub fn last_exchange(&self) -> Option<(String, String, String)> {
        self.last_exchange.lock().clone()
    }

    pub fn last_refresh_token(&self) -> Option<String> {
        self.last_refresh_token.lock().clone()
    }

    fn next(script: &Mutex<VecDeque<Scripted>>) -> Result<TokenResponse, OAuthClientError> {
        match script.lock().pop_front() {
            Some(scripted) => scripted.map_err(OAuthClientError::OAuthError),
            None => Err(OAuthClientError::ParseError("no scripted response".to_string())),
        }
    }
}

#[async_trait]
impl OAuthClientTrait for MockOAuthClient {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, OAuthClientError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_exchange.lock() =
            Some((code.to_string(), code_verifier.to_string(), redirect_uri.to_string()));
        Self::next(&self.exchange_responses)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, OAuthClientError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_refresh_token.lock() = Some(refresh_token.to_string());

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        Self::next(&self.refresh_responses)
    }
}

/// Crypto provider with constant "random" bytes and real SHA-256
#[derive(Debug, Clone, Copy)]
pub struct FixedCrypto {
    byte: u8,
}

impl FixedCrypto {
    pub fn new(byte: u8) -> Self {
        Self { byte }
    }
}

impl CryptoProvider for FixedCrypto {
    fn random_bytes(&self, len: usize) -> Vec<u8> {
        vec![self.byte; len]
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripts_are_consumed_in_order() {
        let client = MockOAuthClient::new();
        client.push_refresh_ok("A2", None, 60);
        client.push_refresh_err("invalid_grant", "revoked");

        assert_eq!(client.refresh("R").await.unwrap().access_token, "A2");
        assert_eq!(client.refresh("R").await.unwrap_err().code(), "invalid_grant");
        assert_eq!(client.refresh("R").await.unwrap_err().code(), "invalid_response");
        assert_eq!(client.refresh_calls(), 3);
    }

    #[test]
    fn fixed_crypto_repeats_byte() {
        assert_eq!(FixedCrypto::new(7).random_bytes(3), vec![7, 7, 7]);
    }
}
