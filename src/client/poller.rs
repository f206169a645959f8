//! Job completion poller
//!
//! Submits a remote job and polls its status until it reaches a terminal
//! state. The wait between polls starts at `initial_delay` and follows the
//! server's `recommended_pull_delay_ms` whenever a pending response carries a
//! positive one. Polling is bounded by `max_attempts`; running out raises
//! `WebcrawlerError::Timeout`.

use crate::config::PollingConfig;
use crate::models::JobId;
use crate::status::{JobResult, PollResponse, StatusShape};
use crate::{Result, WebcrawlerError};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One status poll, as reported to a `PollOptions` observer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollEvent {
    pub job_id: String,
    /// 1-based poll number
    pub attempt: u32,
    /// Time waited before this poll
    pub delay: Duration,
    /// Raw status returned by the poll
    pub status: String,
}

/// Callback receiving every `PollEvent`
pub type PollObserver = Arc<dyn Fn(&PollEvent) + Send + Sync>;

/// Settings for one poll sequence
#[derive(Clone)]
pub struct PollOptions {
    /// Wait before the first poll
    pub initial_delay: Duration,

    /// Maximum number of status polls
    pub max_attempts: u32,

    /// Classification rule for the polled status
    pub status_shape: StatusShape,

    observer: Option<PollObserver>,
    cancel: Option<CancellationToken>,
}

impl PollOptions {
    pub fn new(initial_delay: Duration, max_attempts: u32) -> Self {
        Self {
            initial_delay,
            max_attempts,
            status_shape: StatusShape::Standard,
            observer: None,
            cancel: None,
        }
    }

    pub fn with_status_shape(mut self, status_shape: StatusShape) -> Self {
        self.status_shape = status_shape;
        self
    }

    /// Registers a callback invoked after every poll
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&PollEvent) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Ends the poll sequence with `Cancelled` once the token fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn cancellation_token(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    fn notify(&self, event: &PollEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollOptions {
    fn from(config: &PollingConfig) -> Self {
        Self::new(
            Duration::from_millis(config.initial_pull_delay_ms),
            config.max_polling_retries,
        )
    }
}

impl fmt::Debug for PollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollOptions")
            .field("initial_delay", &self.initial_delay)
            .field("max_attempts", &self.max_attempts)
            .field("status_shape", &self.status_shape)
            .field("observer", &self.observer.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

/// Mutable state of one poll loop invocation
struct PollState {
    current_delay: Duration,
    attempts_remaining: u32,
    last_observed_status: Option<String>,
}

impl PollState {
    fn new(options: &PollOptions) -> Self {
        Self {
            current_delay: options.initial_delay,
            attempts_remaining: options.max_attempts,
            last_observed_status: None,
        }
    }
}

/// Submits a job and polls it until it finishes
///
/// # Flow
///
/// 1. `submit()` returns the job id; an empty id is an `InvalidResponse`
///    and nothing is polled
/// 2. Wait, poll with `fetch_status(id)`, classify
/// 3. Terminal statuses return immediately
/// 4. Pending statuses adopt a positive recommended delay, otherwise keep the
///    current one
/// 5. After `max_attempts` pending polls, fail with `Timeout`
///
/// Errors from `submit` or `fetch_status` end the sequence unchanged.
///
/// # Example
///
/// ```no_run
/// use webcrawlerapi::{run_job_to_completion, JobId, PollOptions, WebcrawlerClient};
/// use webcrawlerapi::ScrapeRequest;
///
/// # async fn example(client: WebcrawlerClient, request: ScrapeRequest) -> webcrawlerapi::Result<()> {
/// let result = run_job_to_completion(
///     || client.scrape_async(&request),
///     |id: JobId| {
///         let client = client.clone();
///         async move { client.get_scrape_result(id.as_str()).await }
///     },
///     &PollOptions::default(),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_job_to_completion<T, S, SFut, F, FFut>(
    submit: S,
    fetch_status: F,
    options: &PollOptions,
) -> Result<JobResult<T>>
where
    T: PollResponse,
    S: FnOnce() -> SFut,
    SFut: Future<Output = Result<JobId>>,
    F: FnMut(JobId) -> FFut,
    FFut: Future<Output = Result<T>>,
{
    let job_id = cancellable(submit(), options.cancellation_token()).await??;

    if job_id.is_empty() {
        return Err(WebcrawlerError::InvalidResponse(
            "API returned an empty job id".to_string(),
        ));
    }

    info!("Submitted job {}, polling for completion", job_id);

    poll_until_terminal(&job_id, fetch_status, options).await
}

/// Polls an already submitted job until it finishes
///
/// Same loop as `run_job_to_completion` without the submit step.
pub async fn poll_until_terminal<T, F, FFut>(
    job_id: &JobId,
    mut fetch_status: F,
    options: &PollOptions,
) -> Result<JobResult<T>>
where
    T: PollResponse,
    F: FnMut(JobId) -> FFut,
    FFut: Future<Output = Result<T>>,
{
    if job_id.is_empty() {
        return Err(WebcrawlerError::InvalidResponse(
            "cannot poll an empty job id".to_string(),
        ));
    }

    let cancel = options.cancellation_token();
    let mut state = PollState::new(options);
    let mut attempt = 0;

    while state.attempts_remaining > 0 {
        attempt += 1;
        let delay = state.current_delay;

        cancellable(tokio::time::sleep(delay), cancel).await?;
        let response = cancellable(fetch_status(job_id.clone()), cancel).await??;

        let status = response.status().to_string();
        let recommended = response.recommended_pull_delay();

        debug!(
            "Job {} poll {}/{} after {:?}: status={}",
            job_id, attempt, options.max_attempts, delay, status
        );
        options.notify(&PollEvent {
            job_id: job_id.id.clone(),
            attempt,
            delay,
            status: status.clone(),
        });

        match JobResult::from_response(response, options.status_shape) {
            JobResult::Pending => {
                if let Some(recommended) = recommended {
                    state.current_delay = recommended;
                }
                state.last_observed_status = Some(status);
                state.attempts_remaining -= 1;
            }
            terminal => {
                info!(
                    "Job {} finished with status {} after {} poll(s)",
                    job_id, status, attempt
                );
                return Ok(terminal);
            }
        }
    }

    warn!(
        "Job {} still {:?} after {} polls, giving up",
        job_id, state.last_observed_status, options.max_attempts
    );

    Err(WebcrawlerError::Timeout {
        attempts: options.max_attempts,
        last_status: state.last_observed_status,
    })
}

/// Races a future against the cancellation token, if any
async fn cancellable<F: Future>(
    future: F,
    cancel: Option<&CancellationToken>,
) -> Result<F::Output> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(WebcrawlerError::Cancelled),
            output = future => Ok(output),
        },
        None => Ok(future.await),
    }
}
