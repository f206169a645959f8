//! Crawl and job endpoints

use super::poller::{poll_until_terminal, run_job_to_completion, PollOptions};
use super::WebcrawlerClient;
use crate::models::{CrawlRequest, Job, JobId};
use crate::status::{JobResult, StatusShape};
use crate::Result;

/// Crawl endpoints are only served under v1
const CRAWL_API_VERSION: &str = "v1";

impl WebcrawlerClient {
    // =============================================================================
    // Submission
    // =============================================================================

    /// Submits a crawl without waiting for it
    pub async fn crawl_async(&self, request: &CrawlRequest) -> Result<JobId> {
        let path = format!("/{}/crawl", CRAWL_API_VERSION);
        self.transport().post_json(&path, &[], request).await
    }

    /// Submits a crawl and polls it to completion with the client's poll options
    ///
    /// Items of the returned job are plain data; fetch their content with
    /// `get_content`.
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<JobResult<Job>> {
        self.crawl_with_options(request, self.poll_options()).await
    }

    /// Like `crawl`, with explicit poll options
    pub async fn crawl_with_options(
        &self,
        request: &CrawlRequest,
        options: &PollOptions,
    ) -> Result<JobResult<Job>> {
        let options = options.clone().with_status_shape(StatusShape::Standard);

        run_job_to_completion(
            || self.crawl_async(request),
            move |id: JobId| async move { self.poll_job(id.as_str()).await },
            &options,
        )
        .await
    }

    // =============================================================================
    // Status
    // =============================================================================

    /// Fetches a job with its items
    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        self.transport().get_status(&job_path(job_id), &[]).await
    }

    /// Polls a previously submitted crawl until it finishes
    pub async fn wait_for_job(&self, job_id: &JobId) -> Result<JobResult<Job>> {
        let options = self
            .poll_options()
            .clone()
            .with_status_shape(StatusShape::Standard);

        poll_until_terminal(
            job_id,
            move |id: JobId| async move { self.poll_job(id.as_str()).await },
            &options,
        )
        .await
    }

    /// Job fetch with a cache-busting timestamp
    async fn poll_job(&self, job_id: &str) -> Result<Job> {
        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        self.transport()
            .get_status(&job_path(job_id), &[("t", timestamp.as_str())])
            .await
    }
}

fn job_path(job_id: &str) -> String {
    format!("/{}/job/{}", CRAWL_API_VERSION, job_id)
}
