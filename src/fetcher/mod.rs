//! HTTP access to the job-search API
//!
//! - [`http`] - GET with retry, backoff and Retry-After handling
//! - [`jobs_api`] - listing-page and overview calls on top of the retry client
//! - [`pagination`] - page-by-page driver for listing searches
//! - [`retry_formatter`] - consistent retry log messages

use reqwest::StatusCode;
use serde_json::Value;

pub mod http;
pub mod jobs_api;
pub mod pagination;
pub mod retry_formatter;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    ClientError(String),

    /// A capped retry policy ran out of attempts
    #[error("request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Attempts made, including the first
        attempts: u32,
        /// Description of the last failure
        last_error: String,
    },

    /// Shutdown was requested while waiting
    #[error("interrupted by shutdown request")]
    Interrupted,
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Final outcome of a single logical GET (after any retries)
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// HTTP 200. `body` is `None` when the payload was not valid JSON.
    Success {
        /// Parsed JSON body
        body: Option<Value>,
        /// Attempts it took, including the first
        attempts: u32,
    },
    /// A non-retryable status. The caller treats it as "no data".
    Rejected {
        /// Status returned by the upstream
        status: StatusCode,
    },
}

impl FetchOutcome {
    /// The parsed body of a successful call, if any
    pub fn into_body(self) -> Option<Value> {
        match self {
            FetchOutcome::Success { body, .. } => body,
            FetchOutcome::Rejected { .. } => None,
        }
    }
}
