//! Client for the WebcrawlerAPI
//!
//! This module contains everything that talks to the remote API:
//! - HTTP transport with authentication and error mapping
//! - The job completion poller
//! - Scrape and crawl endpoints
//! - Lazy content resolution for crawled items

mod content;
mod crawl;
mod poller;
mod scrape;
mod transport;

pub use content::{content_url, fetch_content};
pub use poller::{
    poll_until_terminal, run_job_to_completion, PollEvent, PollObserver, PollOptions,
};
pub use transport::{build_http_client, Transport, USER_AGENT};

use crate::config::{Config, DEFAULT_API_VERSION, DEFAULT_BASE_PATH};
use crate::{Result, WebcrawlerError};
use reqwest::Client;

/// Async client for the WebcrawlerAPI
///
/// The client is cheap to clone and can drive many poll sequences
/// concurrently; each call owns its own poll state.
///
/// # Example
///
/// ```no_run
/// use webcrawlerapi::{CrawlRequest, ScrapeType, WebcrawlerClient};
///
/// # async fn example() -> webcrawlerapi::Result<()> {
/// let client = WebcrawlerClient::new("my-api-key");
/// let request = CrawlRequest::new("https://example.com").with_scrape_type(ScrapeType::Markdown);
///
/// let job = client.crawl(&request).await?.into_done()?;
/// for item in &job.job_items {
///     if let Some(markdown) = client.get_content(item, &job).await? {
///         println!("{}: {} bytes", item.original_url, markdown.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WebcrawlerClient {
    transport: Transport,
    api_version: String,
    poll_options: PollOptions,
}

impl WebcrawlerClient {
    /// Creates a client for the production API with default polling
    ///
    /// If the configured HTTP client cannot be built, this falls back to
    /// `reqwest::Client::new()`, which has no crate user agent, no timeouts
    /// and no compression, and logs a warning. Use `try_new` to get the error
    /// instead.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = build_http_client().unwrap_or_else(|e| {
            tracing::warn!("Falling back to a default HTTP client: {}", e);
            Client::new()
        });
        Self::with_client(api_key, DEFAULT_BASE_PATH, http)
    }

    /// Creates a client for the production API, failing if the HTTP client
    /// cannot be built
    pub fn try_new(api_key: impl Into<String>) -> Result<Self> {
        let http = build_http_client().map_err(|source| WebcrawlerError::Network {
            url: DEFAULT_BASE_PATH.to_string(),
            source,
        })?;
        Ok(Self::with_client(api_key, DEFAULT_BASE_PATH, http))
    }

    /// Creates a client around a caller-configured reqwest client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        api_key: impl Into<String>,
        base_path: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            transport: Transport::new(http, base_path, api_key),
            api_version: DEFAULT_API_VERSION.to_string(),
            poll_options: PollOptions::default(),
        }
    }

    /// Creates a client from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        crate::config::validate(config)?;

        let http = build_http_client().map_err(|source| WebcrawlerError::Network {
            url: config.api.base_path.clone(),
            source,
        })?;

        Ok(Self {
            transport: Transport::new(http, &config.api.base_path, &config.api.api_key),
            api_version: config.api.api_version.clone(),
            poll_options: PollOptions::from(&config.polling),
        })
    }

    /// Points the client at a different API host
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.transport = self.transport.with_base_path(base_path);
        self
    }

    /// Sets the version segment used by scrape endpoints (e.g. "v2")
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Sets the default polling behaviour for `scrape_with_meta`, `crawl` and `wait_for_*`
    pub fn with_poll_options(mut self, poll_options: PollOptions) -> Self {
        self.poll_options = poll_options;
        self
    }

    pub fn base_path(&self) -> &str {
        self.transport.base_path()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn poll_options(&self) -> &PollOptions {
        &self.poll_options
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }
}
