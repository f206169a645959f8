//! Status sentinels used by the remote API
//!
//! Any status string can be classified; `JobStatus` only names the values the
//! API documents.
use std::fmt;

/// Known job and scrape statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    // ===== Pending States =====
    /// Job accepted but not picked up yet
    New,

    /// Job is running
    InProgress,

    // ===== Terminal States =====
    /// Job finished successfully
    Done,

    /// Job finished with an error
    Error,
}

impl JobStatus {
    /// Returns true for the two terminal statuses
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Converts the status to the string the API uses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Parses a status string from the API
    ///
    /// Returns None if the string is not a documented status.
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Returns all documented statuses
    pub fn all_statuses() -> Vec<Self> {
        vec![Self::New, Self::InProgress, Self::Done, Self::Error]
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a raw status means for the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Keep polling
    Pending,

    /// Terminal success
    Succeeded,

    /// Terminal failure
    Failed,
}

impl Classification {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Classification rule for a status endpoint
///
/// | Raw status      | `Standard`  | `Simple`    |
/// |-----------------|-------------|-------------|
/// | `new`           | Pending     | Pending     |
/// | `in_progress`   | Pending     | Pending     |
/// | `done`          | Succeeded   | Succeeded   |
/// | `error`         | Failed      | Failed      |
/// | anything else   | Failed      | Pending     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusShape {
    /// Job and v1 scrape statuses: only `new`/`in_progress` keep the loop going
    #[default]
    Standard,

    /// v2 scrape statuses: only `done`/`error` end the loop
    Simple,
}

impl StatusShape {
    /// Picks the shape used by scrape status responses of an API version
    pub fn for_api_version(api_version: &str) -> Self {
        if api_version == "v2" {
            Self::Simple
        } else {
            Self::Standard
        }
    }

    /// Classifies a raw status string. Total over all inputs.
    pub fn classify(&self, raw_status: &str) -> Classification {
        match (self, JobStatus::from_api_str(raw_status)) {
            (_, Some(JobStatus::Done)) => Classification::Succeeded,
            (_, Some(JobStatus::Error)) => Classification::Failed,
            (_, Some(JobStatus::New | JobStatus::InProgress)) => Classification::Pending,
            (Self::Standard, None) => Classification::Failed,
            (Self::Simple, None) => Classification::Pending,
        }
    }
}
