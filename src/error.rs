//! Error types for the scrape pipeline.
//!
//! Each failure kind is an explicit enum variant so callers can tell a
//! transient network failure from a missing or corrupt store without
//! string-matching a catch-all error. Recovery policy lives with the
//! callers: fetch errors abort the run's write step, store read errors
//! degrade to an empty result at the serving boundary, and store write
//! errors fail the run.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures while retrieving the events listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport failure or non-success HTTP status.
    #[error("target unavailable: {0}")]
    Unavailable(String),
}

/// Failures while reading or writing the stored events document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The events file does not exist yet.
    #[error("events file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The events file exists but is not a valid JSON event array.
    #[error("events file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Any other filesystem failure (permissions, disk full, rename).
    #[error("events file i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
