//! HTTP transport for the WebcrawlerAPI
//!
//! This module sends single requests to the API:
//! - Building the HTTP client with the crate's user agent
//! - Attaching the bearer token to every request
//! - Disabling intermediary caches on status polls
//! - Mapping non-success responses to `WebcrawlerError::Remote`
//! - Decoding JSON bodies

use crate::{Result, WebcrawlerError};
use reqwest::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("webcrawlerapi-rust/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the API on non-success responses
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorResponse {
    error_code: Option<String>,
    error_message: Option<String>,
    error: Option<String>,
}

/// Builds an HTTP client configured for the API
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```
/// use webcrawlerapi::client::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends authenticated requests relative to a base path
#[derive(Clone)]
pub struct Transport {
    http: Client,
    base_path: String,
    api_key: String,
}

// Keeps the API key out of logs
impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_path", &self.base_path)
            .field("api_key", &"***")
            .finish()
    }
}

impl Transport {
    pub fn new(http: Client, base_path: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_path = base_path.into();
        Self {
            http,
            base_path: base_path.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Same credentials and HTTP client against another host
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Absolute URL for an API path such as `/v1/crawl`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    /// POSTs a JSON body and decodes the JSON response
    pub async fn post_json<B, T>(&self, path: &str, query: &[(&str, &str)], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .json(body);

        self.send(&url, request).await
    }

    /// GETs a status resource with intermediary caching disabled
    pub async fn get_status<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .header(CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(PRAGMA, "no-cache")
            .header(EXPIRES, "0");

        self.send(&url, request).await
    }

    async fn send<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|source| {
            tracing::warn!("Request to {} failed: {}", url, source);
            WebcrawlerError::Network {
                url: url.to_string(),
                source,
            }
        })?;

        handle_response(url, response).await
    }
}

/// Checks the status code and decodes the body
///
/// Non-success responses become `Remote` errors carrying the API's error code
/// and message, or `unknown_error` / `Unknown error` when the body cannot be
/// decoded.
async fn handle_response<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| WebcrawlerError::Network {
            url: url.to_string(),
            source,
        })?;

    if !status.is_success() {
        let error: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();
        let error_code = error
            .error_code
            .unwrap_or_else(|| "unknown_error".to_string());
        let error_message = error
            .error_message
            .or(error.error)
            .unwrap_or_else(|| "Unknown error".to_string());

        tracing::warn!(
            "API returned {} for {}: {} ({})",
            status.as_u16(),
            url,
            error_message,
            error_code
        );

        return Err(WebcrawlerError::Remote {
            status: status.as_u16(),
            error_code,
            error_message,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        WebcrawlerError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
    })
}
