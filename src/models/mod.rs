//! Request and response types for the WebcrawlerAPI
//!
//! These mirror the JSON the API sends and accepts. Response types are
//! lenient: missing or `null` fields fall back to defaults so that a
//! partially filled status payload still decodes.

mod crawl;
mod scrape;

pub use crawl::{Action, CrawlRequest, Job, JobItem, ScrapeType, UploadS3Action};
pub use scrape::{ScrapeRequest, ScrapeResponse};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Decodes `null` as the type's default; pair with `#[serde(default)]` for missing keys
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier returned when a job or scrape is submitted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct JobId {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
}

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// An empty id means the API accepted the request but returned a malformed body
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
