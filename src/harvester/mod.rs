//! Run orchestration
//!
//! [`Harvester`] owns one immutable [`HarvestConfig`] and drives the
//! fetch → filter → enrich loop, producing a [`HarvestReport`] that the
//! writers in [`crate::output`] persist.
//!
//! # Error Handling
//!
//! Upstream trouble is absorbed below this layer: transient failures are
//! retried, rejections and malformed bodies become empty results. What
//! reaches [`HarvestError`] is configuration, an exhausted attempt cap, or a
//! shutdown request.

pub mod config;
pub mod executor;

pub use config::{HarvestConfig, Jitter, Pacing, RetryPolicy, SearchParams};
pub use executor::{HarvestReport, Harvester};

use crate::fetcher::FetcherError;

/// Harvest errors
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// Invalid configuration, detected before any request
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Fetcher error
    #[error("fetcher error: {0}")]
    Fetcher(#[from] FetcherError),

    /// Shutdown requested; nothing was written
    #[error("harvest interrupted before completion")]
    Interrupted,
}

impl HarvestError {
    /// Whether the run stopped because of a shutdown request
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            HarvestError::Interrupted | HarvestError::Fetcher(FetcherError::Interrupted)
        )
    }
}

/// Result type for harvest operations
pub type HarvestResult<T> = Result<T, HarvestError>;
