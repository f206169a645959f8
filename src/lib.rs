//! webcrawlerapi: an async client for the WebcrawlerAPI scraping service
//!
//! This crate submits scrape and crawl jobs to the remote API, polls them to
//! completion with server-directed back-off, and exposes typed results.
//!
//! # Example
//!
//! ```no_run
//! use webcrawlerapi::{JobResult, ScrapeRequest, WebcrawlerClient};
//!
//! # async fn example() -> webcrawlerapi::Result<()> {
//! let client = WebcrawlerClient::new("my-api-key");
//! let request = ScrapeRequest::new("webcrawler/url-to-md", serde_json::json!({
//!     "url": "https://example.com"
//! }));
//!
//! match client.scrape_with_meta(&request).await? {
//!     JobResult::Done(response) => println!("{:?}", response.structured_data()),
//!     JobResult::Failed { error_message, .. } => eprintln!("failed: {}", error_message),
//!     JobResult::Pending => unreachable!("the poller only returns terminal results"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod models;
pub mod status;

use thiserror::Error;

/// Main error type for webcrawlerapi operations
#[derive(Debug, Error)]
pub enum WebcrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to send request to {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error {error_code} (status {status}): {error_message}")]
    Remote {
        status: u16,
        error_code: String,
        error_message: String,
    },

    #[error("Job did not finish after {attempts} polling attempts (last status: {last_status:?})")]
    Timeout {
        attempts: u32,
        last_status: Option<String>,
    },

    #[error("Failed to fetch content from {url}: {message}")]
    ContentFetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Job failed with {error_code}: {error_message}")]
    JobFailed {
        error_code: String,
        error_message: String,
    },

    #[error("Polling was cancelled")]
    Cancelled,
}

impl WebcrawlerError {
    /// Stable snake_case code identifying the error kind
    ///
    /// Remote and job failures report the code supplied by the API.
    pub fn error_code(&self) -> &str {
        match self {
            Self::Config(_) => "config_error",
            Self::Network { .. } => "network_error",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Remote { error_code, .. } => error_code,
            Self::Timeout { .. } => "timeout",
            Self::ContentFetch { .. } => "content_fetch_error",
            Self::JobFailed { error_code, .. } => error_code,
            Self::Cancelled => "cancelled",
        }
    }

    /// HTTP status attached to the error, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::ContentFetch { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true for a remote 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { status: 404, .. })
    }

    /// Returns true when the remote rejected the API key
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Remote { status: 401 | 403, .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for webcrawlerapi operations
pub type Result<T> = std::result::Result<T, WebcrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{run_job_to_completion, PollEvent, PollOptions, WebcrawlerClient};
pub use config::Config;
pub use models::{
    Action, CrawlRequest, Job, JobId, JobItem, ScrapeRequest, ScrapeResponse, ScrapeType,
    UploadS3Action,
};
pub use status::{JobResult, JobStatus, PollResponse, StatusShape};
