//! Content resolution for crawled items
//!
//! Items only carry content URLs. The content itself is fetched on demand,
//! and only once both the job and the item are done.

use super::WebcrawlerClient;
use crate::models::{Job, JobItem};
use crate::status::JobStatus;
use crate::{Result, WebcrawlerError};
use reqwest::header::ACCEPT;
use reqwest::Client;

/// Picks the content URL of an item for its job's scrape type
///
/// Returns None while the job or the item is not done, when the job's scrape
/// type is unknown, or when the item has no URL for it.
pub fn content_url<'a>(item: &'a JobItem, job: &Job) -> Option<&'a str> {
    if !is_done(&job.status) || !is_done(&item.status) {
        return None;
    }

    item.content_url(job.scrape_type()?)
}

/// Downloads the content of a finished item
///
/// # Returns
///
/// * `Ok(Some(String))` - The content body
/// * `Ok(None)` - No content available yet (see `content_url`); nothing was fetched
/// * `Err(WebcrawlerError::ContentFetch)` - The download failed
pub async fn fetch_content(http: &Client, item: &JobItem, job: &Job) -> Result<Option<String>> {
    let url = match content_url(item, job) {
        Some(url) => url,
        None => {
            tracing::debug!(
                "No content for item {} (job status {}, item status {})",
                item.id,
                job.status,
                item.status
            );
            return Ok(None);
        }
    };

    let fetch_error = |status: Option<u16>, message: String| WebcrawlerError::ContentFetch {
        url: url.to_string(),
        status,
        message,
    };

    let response = http
        .get(url)
        .header(ACCEPT, "*/*")
        .send()
        .await
        .map_err(|e| fetch_error(None, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(
            Some(status.as_u16()),
            format!("server returned {}", status),
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| fetch_error(Some(status.as_u16()), e.to_string()))?;

    Ok(Some(body))
}

fn is_done(status: &str) -> bool {
    JobStatus::from_api_str(status) == Some(JobStatus::Done)
}

impl WebcrawlerClient {
    /// Downloads the content of a crawled item, if it is ready
    pub async fn get_content(&self, item: &JobItem, job: &Job) -> Result<Option<String>> {
        fetch_content(self.transport().http(), item, job).await
    }
}
