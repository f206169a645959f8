//! Job status classification
//!
//! This module decides what a polled status value means for the poll loop.
//!
//! # Components
//!
//! - `JobStatus`: The status sentinels the API emits (new, in_progress, done, error)
//! - `StatusShape`: Which classification rule a status endpoint follows
//! - `Classification`: Pending or one of the two terminal outcomes
//! - `JobResult`: A classified poll response handed back to callers

mod job_status;
mod result;

// Re-export main types
pub use job_status::{Classification, JobStatus, StatusShape};
pub use result::{JobResult, PollResponse, UNKNOWN_ERROR_CODE, UNKNOWN_ERROR_MESSAGE};
