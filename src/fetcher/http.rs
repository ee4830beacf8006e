//! Retrying HTTP client for the job-search API
//!
//! One endpoint, GET only. Rate limits (429) and gateway/server failures
//! (500, 502, 503, 504) are retried, as are transport errors; any other
//! non-200 status is handed back as [`FetchOutcome::Rejected`] so callers can
//! treat it as "no data" instead of failing the run.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::fetcher::retry_formatter::{extract_error_type, RetryContext, RetryErrorType};
use crate::fetcher::{FetchOutcome, FetcherError, FetcherResult};
use crate::harvester::config::{RetryPolicy, RETRYABLE_STATUSES};
use crate::shutdown::{sleep_unless_shutdown, SharedShutdown};

/// GET client with capped exponential backoff
pub struct RetryingHttpClient {
    client: Client,
    endpoint: String,
    policy: RetryPolicy,
    shutdown: Option<SharedShutdown>,
}

/// One failed attempt, before deciding whether to retry
struct FailedAttempt {
    error_type: RetryErrorType,
    retry_after: Option<Duration>,
    message: String,
}

impl RetryingHttpClient {
    /// Build a client with its own connection pool and request timeout
    pub fn new(
        endpoint: impl Into<String>,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> FetcherResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("listing-harvester/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetcherError::ClientError(e.to_string()))?;
        Ok(Self::with_client(client, endpoint, policy))
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client, endpoint: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            policy,
            shutdown: None,
        }
    }

    /// Let retry sleeps be interrupted by a shutdown request
    pub fn with_shutdown(mut self, shutdown: Option<SharedShutdown>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Endpoint every request goes to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Retry policy in effect
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Issue a GET with the given query parameters, retrying transient failures.
    ///
    /// `operation` labels the request in retry logs (it must not contain
    /// secrets; the query itself is never logged).
    ///
    /// # Errors
    /// Only [`FetcherError::RetriesExhausted`] when the policy caps attempts,
    /// and [`FetcherError::Interrupted`] on shutdown.
    pub async fn get(&self, params: &[(&str, String)], operation: &str) -> FetcherResult<FetchOutcome> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            if self
                .shutdown
                .as_ref()
                .is_some_and(|s| s.is_shutdown_requested())
            {
                return Err(FetcherError::Interrupted);
            }

            debug!(operation, attempt, "GET {}", self.endpoint);

            let failure = match self.client.get(&self.endpoint).query(params).send().await {
                Err(e) => FailedAttempt {
                    error_type: extract_error_type(None, Some(&e)),
                    retry_after: None,
                    message: e.to_string(),
                },
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::OK {
                        match response.bytes().await {
                            Ok(bytes) => {
                                let body = parse_body(&bytes, operation);
                                if attempt > 1 {
                                    let ctx = RetryContext::new(
                                        attempt,
                                        self.policy.max_attempts,
                                        RetryErrorType::NetworkGeneric,
                                        operation,
                                        "",
                                    );
                                    info!("{}", ctx.format_success());
                                }
                                return Ok(FetchOutcome::Success {
                                    body,
                                    attempts: attempt,
                                });
                            }
                            Err(e) => FailedAttempt {
                                error_type: extract_error_type(None, Some(&e)),
                                retry_after: None,
                                message: format!("failed to read response body: {e}"),
                            },
                        }
                    } else if is_retryable(status) {
                        FailedAttempt {
                            error_type: extract_error_type(Some(status), None),
                            retry_after: parse_retry_after(response.headers()),
                            message: format!("HTTP {status}"),
                        }
                    } else {
                        warn!(
                            operation,
                            status = status.as_u16(),
                            "Non-retryable response, treating as empty"
                        );
                        return Ok(FetchOutcome::Rejected { status });
                    }
                }
            };

            let ctx = RetryContext::new(
                attempt,
                self.policy.max_attempts,
                failure.error_type,
                operation,
                failure.message,
            );

            if !self.policy.allows_retry(attempt) {
                error!("{}", ctx.format_failure());
                return Err(FetcherError::RetriesExhausted {
                    attempts: attempt,
                    last_error: ctx.error_message,
                });
            }

            let server_hint = failure.retry_after.is_some();
            let delay = failure
                .retry_after
                .unwrap_or_else(|| self.policy.backoff(attempt));
            let ctx = ctx.with_backoff(delay, server_hint);
            warn!("{}", ctx.format_retry());

            sleep_unless_shutdown(self.shutdown.as_ref(), delay)
                .await
                .map_err(|_| FetcherError::Interrupted)?;
        }
    }
}

/// Whether a status belongs to the transient class
pub fn is_retryable(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status.as_u16())
}

/// Parse a `Retry-After` header given as (possibly fractional) seconds.
///
/// HTTP-date values, negative and non-finite numbers are ignored so the
/// computed backoff applies instead.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    let seconds: f64 = raw.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        debug!(value = raw, "Ignoring unusable Retry-After header");
        return None;
    }
    Duration::try_from_secs_f64(seconds).ok()
}

fn parse_body(bytes: &[u8], operation: &str) -> Option<Value> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(operation, error = %e, "Response body is not valid JSON, treating as empty");
            None
        }
    }
}
