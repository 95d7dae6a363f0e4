//! Durable crawl progress
//!
//! - `ProgressTracker`: the last fully processed listing page, so an
//!   interrupted crawl resumes after it
//! - `FailureLog`: append-only audit of recipe URLs that failed

mod checkpoint;
mod failure_log;

pub use checkpoint::ProgressTracker;
pub use failure_log::{FailedUrl, FailureLog};
