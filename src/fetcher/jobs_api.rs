//! Listing-page and overview calls against the job-search endpoint
//!
//! The same endpoint serves both shapes: a page of listing objects when
//! search parameters are sent, and a detail overview when `job_id` is sent.

use serde_json::Value;
use tracing::{debug, warn};

use crate::extract::OverviewPayload;
use crate::fetcher::http::RetryingHttpClient;
use crate::fetcher::{FetchOutcome, FetcherResult};
use crate::harvester::config::SearchParams;
use crate::shutdown::SharedShutdown;
use crate::ListingSummary;
use reqwest::StatusCode;

/// Result of requesting one listing page
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// At least one listing
    Rows(Vec<ListingSummary>),
    /// The upstream has nothing more (empty, non-array or malformed body)
    EndOfResults,
    /// The upstream refused the request with a non-retryable status
    UpstreamRejected(StatusCode),
}

/// Typed access to the job-search API
pub struct JobsApi {
    http: RetryingHttpClient,
    api_key: String,
}

impl JobsApi {
    /// Create an API adapter over a retrying client
    pub fn new(http: RetryingHttpClient, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    /// Let retry sleeps of the underlying client be interrupted by a shutdown request
    pub fn with_shutdown(mut self, shutdown: Option<SharedShutdown>) -> Self {
        self.http = self.http.with_shutdown(shutdown);
        self
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &RetryingHttpClient {
        &self.http
    }

    /// Request one listing page (1-based)
    pub async fn fetch_page(&self, search: &SearchParams, page: u32) -> FetcherResult<PageOutcome> {
        let mut params = vec![("api_key", self.api_key.clone())];
        params.extend(search.page_query(page));

        let outcome = self.http.get(&params, &format!("page {page}")).await?;
        let body = match outcome {
            FetchOutcome::Rejected { status } => return Ok(PageOutcome::UpstreamRejected(status)),
            FetchOutcome::Success { body, .. } => body,
        };

        let rows = match body {
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                debug!(page, kind = json_kind(&other), "Listing page is not an array");
                return Ok(PageOutcome::EndOfResults);
            }
            None => return Ok(PageOutcome::EndOfResults),
        };

        if rows.is_empty() {
            return Ok(PageOutcome::EndOfResults);
        }

        let total = rows.len();
        let listings: Vec<_> = rows.iter().filter_map(ListingSummary::from_value).collect();
        if listings.len() < total {
            warn!(
                page,
                skipped = total - listings.len(),
                "Skipped non-object entries in listing page"
            );
        }
        if listings.is_empty() {
            return Ok(PageOutcome::EndOfResults);
        }
        Ok(PageOutcome::Rows(listings))
    }

    /// Request the overview for one job.
    ///
    /// An empty `job_id` short-circuits to [`OverviewPayload::Empty`] without a
    /// request, as do rejected and malformed responses.
    pub async fn fetch_overview(&self, job_id: &str) -> FetcherResult<OverviewPayload> {
        if job_id.is_empty() {
            return Ok(OverviewPayload::Empty);
        }
        let params = [
            ("api_key", self.api_key.clone()),
            ("job_id", job_id.to_string()),
        ];
        let outcome = self.http.get(&params, &format!("overview {job_id}")).await?;
        Ok(OverviewPayload::from(outcome.into_body()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
