//! Spotify Web API client
//!
//! Every request obtains its bearer token from the [`AccessTokenProvider`]
//! immediately before it is sent, so an expired token is refreshed (once,
//! however many requests are in flight) before it reaches the API.

use std::sync::Arc;

use encore_domain::{Page, SpotifyConfig};
use reqwest::header::RETRY_AFTER;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::HttpClient;

/// Error object returned by the API: `{"error": {"status", "message"}}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Object {
        #[serde(default)]
        status: Option<u16>,
        #[serde(default)]
        message: Option<String>,
    },
    Text(String),
}

/// Resource API client
#[derive(Clone)]
pub struct SpotifyClient {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(
        http: HttpClient,
        auth: Arc<dyn AccessTokenProvider>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, auth, base_url }
    }

    /// Create a client for the configured API base URL
    pub fn from_config(
        config: &SpotifyConfig,
        http: HttpClient,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self::new(http, auth, config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{endpoint}", self.base_url))
            .map_err(|e| ApiError::request(None, format!("invalid endpoint {endpoint}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET `endpoint` with `query` and decode the JSON body
    ///
    /// A body carrying an `error` object is an error whatever the HTTP
    /// status.
    ///
    /// # Errors
    /// - [`ApiError::Auth`] when no access token can be obtained
    /// - [`ApiError::ApiRequest`] for transport failures, API error objects
    ///   and unexpected bodies
    #[instrument(skip(self, query), fields(endpoint = %endpoint))]
    pub async fn fetch_api<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint_url(endpoint, query)?;
        let token = self.auth.access_token().await?;

        let request = self
            .http
            .request(Method::GET, url)
            .bearer_auth(token)
            .header("Content-Type", "application/json");
        let response = self.http.send(request).await?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let body = response.text().await?;
        decode_body(status, &body).map_err(|e| e.with_retry_after(retry_after))
    }

    /// Fetch every item of an offset-paged list
    ///
    /// Offsets advance by the number of items received. Paging stops when
    /// `next` is absent, or a page is empty or shorter than `limit`.
    ///
    /// # Errors
    /// Propagates the first failing page's error.
    pub async fn paginate<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        extra: &[(&str, String)],
        limit: u32,
    ) -> Result<Vec<T>, ApiError> {
        self.paginate_with(endpoint, extra, limit, |page: Page<T>| page).await
    }

    /// [`Self::paginate`] for responses that nest the page inside another
    /// object (e.g. `{"artists": {...}}`)
    ///
    /// # Errors
    /// Propagates the first failing page's error.
    #[instrument(skip(self, extra, extract), fields(endpoint = %endpoint))]
    pub async fn paginate_with<R, T, F>(
        &self,
        endpoint: &str,
        extra: &[(&str, String)],
        limit: u32,
        extract: F,
    ) -> Result<Vec<T>, ApiError>
    where
        R: DeserializeOwned,
        F: Fn(R) -> Page<T>,
    {
        let mut items = Vec::new();
        let mut offset: usize = 0;
        let mut pages = 0_u32;

        loop {
            let mut query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
            query.extend(extra.iter().cloned());

            let page = extract(self.fetch_api::<R>(endpoint, &query).await?);
            pages += 1;

            let received = page.items.len();
            let has_next = page.has_next();
            items.extend(page.items);
            offset += received;

            debug!(received, offset, has_next, "fetched page");
            if !has_next || received == 0 || received < limit as usize {
                break;
            }
        }

        info!(total = items.len(), pages, "pagination complete");
        Ok(items)
    }
}

/// Interpret an API response body
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    let code = Some(status.as_u16());
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if status.is_success() => {
            return Err(ApiError::request(code, format!("invalid JSON response: {e}")));
        }
        Err(_) => {
            let reason = status.canonical_reason().unwrap_or("unexpected status");
            return Err(ApiError::request(code, reason));
        }
    };

    if let Some(error) = value.get("error") {
        return Err(match serde_json::from_value::<ErrorBody>(error.clone()) {
            Ok(ErrorBody::Object { status, message }) => ApiError::request(
                status.or(code),
                message.unwrap_or_else(|| "unknown error".to_string()),
            ),
            Ok(ErrorBody::Text(message)) => ApiError::request(code, message),
            Err(_) => ApiError::request(code, error.to_string()),
        });
    }

    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("unexpected status");
        return Err(ApiError::request(code, reason));
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::request(code, format!("unexpected response shape: {e}")))
}
