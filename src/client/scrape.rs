//! Scrape endpoints

use super::poller::{poll_until_terminal, run_job_to_completion, PollOptions};
use super::WebcrawlerClient;
use crate::models::{JobId, ScrapeRequest, ScrapeResponse};
use crate::status::{JobResult, StatusShape};
use crate::Result;
use serde_json::Value;

impl WebcrawlerClient {
    // =============================================================================
    // Submission
    // =============================================================================

    /// Submits a scrape without waiting for it
    ///
    /// On API version `v2` the request is sent with `?async=true`.
    pub async fn scrape_async(&self, request: &ScrapeRequest) -> Result<JobId> {
        let query: &[(&str, &str)] = if self.uses_async_scrape() {
            &[("async", "true")]
        } else {
            &[]
        };

        self.transport()
            .post_json(&self.scrape_path(), query, request)
            .await
    }

    /// Submits a scrape and polls it to completion with the client's poll options
    ///
    /// # Returns
    /// `JobResult::Done` with the final status payload, or `JobResult::Failed`
    /// carrying the remote error code and message.
    pub async fn scrape_with_meta(
        &self,
        request: &ScrapeRequest,
    ) -> Result<JobResult<ScrapeResponse>> {
        self.scrape_with_options(request, self.poll_options()).await
    }

    /// Like `scrape_with_meta`, with explicit poll options
    pub async fn scrape_with_options(
        &self,
        request: &ScrapeRequest,
        options: &PollOptions,
    ) -> Result<JobResult<ScrapeResponse>> {
        let options = self.scrape_poll_options(options);
        let debug = request.is_debug();

        run_job_to_completion(
            || self.scrape_async(request),
            move |id: JobId| async move { self.fetch_scrape_status(id.as_str(), debug).await },
            &options,
        )
        .await
    }

    /// Submits a scrape, waits for it, and returns its structured data
    ///
    /// A failed scrape is returned as `WebcrawlerError::JobFailed`.
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<Value> {
        let response = self.scrape_with_meta(request).await?.into_done()?;
        Ok(response.into_structured_data())
    }

    // =============================================================================
    // Status
    // =============================================================================

    /// Fetches the current status of a scrape
    pub async fn get_scrape_result(&self, scrape_id: &str) -> Result<ScrapeResponse> {
        self.fetch_scrape_status(scrape_id, false).await
    }

    /// Polls a previously submitted scrape until it finishes
    pub async fn wait_for_scrape(&self, scrape_id: &JobId) -> Result<JobResult<ScrapeResponse>> {
        let options = self.scrape_poll_options(self.poll_options());

        poll_until_terminal(
            scrape_id,
            move |id: JobId| async move { self.fetch_scrape_status(id.as_str(), false).await },
            &options,
        )
        .await
    }

    async fn fetch_scrape_status(&self, scrape_id: &str, debug: bool) -> Result<ScrapeResponse> {
        let path = format!("{}/{}", self.scrape_path(), scrape_id);
        let response: ScrapeResponse = self.transport().get_status(&path, &[]).await?;

        if debug {
            tracing::info!(
                "Scrape result: {}",
                serde_json::to_string(&response).unwrap_or_default()
            );
        }

        Ok(response)
    }

    fn scrape_path(&self) -> String {
        format!("/{}/scrape", self.api_version())
    }

    fn uses_async_scrape(&self) -> bool {
        self.api_version() == "v2"
    }

    fn scrape_poll_options(&self, options: &PollOptions) -> PollOptions {
        options
            .clone()
            .with_status_shape(StatusShape::for_api_version(self.api_version()))
    }
}
