//! Classified poll responses

use super::{Classification, StatusShape};
use crate::WebcrawlerError;
use std::time::Duration;

/// Error code reported when a failed job carries none
pub const UNKNOWN_ERROR_CODE: &str = "unknown_error";

/// Error message reported when a failed job carries none
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// A status response the poller can classify
pub trait PollResponse {
    /// Raw status string as returned by the API
    fn status(&self) -> &str;

    /// Server hint for the wait before the next poll, in milliseconds
    fn recommended_pull_delay_ms(&self) -> i64;

    fn error_code(&self) -> Option<&str> {
        None
    }

    fn error_message(&self) -> Option<&str> {
        None
    }

    /// Positive recommended delay, if any
    fn recommended_pull_delay(&self) -> Option<Duration> {
        u64::try_from(self.recommended_pull_delay_ms())
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

/// Outcome of classifying one status response
#[derive(Debug, Clone, PartialEq)]
pub enum JobResult<T> {
    /// The job is still running
    Pending,

    /// The job finished successfully; carries the full status payload
    Done(T),

    /// The job finished with an error
    Failed {
        error_code: String,
        error_message: String,
        /// The status payload the failure was read from
        payload: T,
    },
}

impl<T: PollResponse> JobResult<T> {
    /// Classifies a status response under the given shape
    pub fn from_response(response: T, shape: StatusShape) -> Self {
        match shape.classify(response.status()) {
            Classification::Pending => Self::Pending,
            Classification::Succeeded => Self::Done(response),
            Classification::Failed => Self::Failed {
                error_code: response
                    .error_code()
                    .filter(|c| !c.is_empty())
                    .unwrap_or(UNKNOWN_ERROR_CODE)
                    .to_string(),
                error_message: response
                    .error_message()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(UNKNOWN_ERROR_MESSAGE)
                    .to_string(),
                payload: response,
            },
        }
    }
}

impl<T> JobResult<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The status payload, for either terminal variant
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Pending => None,
            Self::Done(payload) | Self::Failed { payload, .. } => Some(payload),
        }
    }

    /// Converts into the success payload
    ///
    /// `Failed` becomes `JobFailed`; `Pending` becomes `InvalidResponse`
    /// because a caller asking for a payload expects a terminal result.
    pub fn into_done(self) -> Result<T, WebcrawlerError> {
        match self {
            Self::Done(payload) => Ok(payload),
            Self::Failed {
                error_code,
                error_message,
                ..
            } => Err(WebcrawlerError::JobFailed {
                error_code,
                error_message,
            }),
            Self::Pending => Err(WebcrawlerError::InvalidResponse(
                "job has not finished yet".to_string(),
            )),
        }
    }
}
