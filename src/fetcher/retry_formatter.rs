//! Retry message formatting for the HTTP client.
//!
//! Keeps retry, recovery and give-up log lines uniform whichever request
//! (listing page or overview) triggered them.

use reqwest::{Error as ReqwestError, StatusCode};
use std::time::Duration;

/// Classification of retry errors for user messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryErrorType {
    /// Request timed out
    NetworkTimeout,
    /// Connection refused, DNS failure, or other offline scenarios
    NetworkOffline,
    /// HTTP 429 rate limit exceeded
    RateLimit,
    /// HTTP 5xx server error
    ServerError(u16),
    /// Generic fallback when no better classification fits
    NetworkGeneric,
}

impl RetryErrorType {
    /// User-friendly description string used inside retry log messages.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NetworkTimeout => "network timeout",
            Self::NetworkOffline => "connection failed",
            Self::RateLimit => "rate limit exceeded",
            Self::ServerError(code) => match code {
                500 => "internal server error",
                502 => "bad gateway",
                503 => "service unavailable",
                504 => "gateway timeout",
                _ => "server error",
            },
            Self::NetworkGeneric => "network error",
        }
    }

    /// Suggested remediation shown when a capped policy gives up.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NetworkTimeout => "Check your network connection and firewall settings",
            Self::NetworkOffline => "Verify internet connectivity and DNS resolution",
            Self::RateLimit => "Increase BASE_DELAY / OV_DELAY or check your API plan quota",
            Self::ServerError(_) => "The job-search API may be degraded, try again later",
            Self::NetworkGeneric => "Check network connectivity and try again",
        }
    }
}

/// Context for formatting retry messages.
#[derive(Debug, Clone)]
pub struct RetryContext {
    /// Attempt that just failed (1-based)
    pub attempt: u32,
    /// Attempt cap, `None` when retrying forever
    pub max_attempts: Option<u32>,
    /// Type of error that triggered retry
    pub error_type: RetryErrorType,
    /// Wait before the next attempt
    pub backoff_duration: Duration,
    /// Whether the wait came from the server's Retry-After header
    pub server_hint: bool,
    /// What was being fetched, e.g. "page 3" or "overview 4012345678"
    pub operation: String,
    /// Original error message for details
    pub error_message: String,
}

impl RetryContext {
    /// Convenience constructor used by the retry loop.
    pub fn new(
        attempt: u32,
        max_attempts: Option<u32>,
        error_type: RetryErrorType,
        operation: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            attempt,
            max_attempts,
            error_type,
            backoff_duration: Duration::ZERO,
            server_hint: false,
            operation: operation.into(),
            error_message: error_message.into(),
        }
    }

    /// Record the wait chosen for the next attempt
    pub fn with_backoff(mut self, backoff: Duration, server_hint: bool) -> Self {
        self.backoff_duration = backoff;
        self.server_hint = server_hint;
        self
    }

    fn attempt_label(&self) -> String {
        match self.max_attempts {
            Some(max) => format!("{}/{}", self.attempt, max),
            None => self.attempt.to_string(),
        }
    }

    /// Format standardized retry message with attempt counter and wait.
    pub fn format_retry(&self) -> String {
        let mut message = format!(
            "Retrying (attempt {}) after {} - waiting {:.1} seconds",
            self.attempt_label(),
            self.error_type.description(),
            self.backoff_duration.as_secs_f64()
        );
        if self.server_hint {
            message.push_str(" (Retry-After)");
        }
        append_operation(&mut message, &self.operation);
        message
    }

    /// Format the message logged when an attempt after a failure succeeds.
    pub fn format_success(&self) -> String {
        let mut message = format!("Request succeeded on attempt {}", self.attempt_label());
        append_operation(&mut message, &self.operation);
        message
    }

    /// Format final failure summary with actionable suggestions.
    pub fn format_failure(&self) -> String {
        let mut lines = vec![
            format!("[FAILED] Request gave up after {} attempts", self.attempt),
            format!("  Last error: {}", self.error_message),
        ];
        if !self.operation.is_empty() {
            lines.push(format!("  Request: {}", self.operation));
        }
        lines.push(format!("  Suggestion: {}", self.error_type.suggestion()));
        lines.push("  Raise --max-attempts or leave it unset to retry indefinitely".to_string());
        lines.join("\n")
    }
}

/// Extract a [`RetryErrorType`] from an HTTP status or reqwest error.
pub fn extract_error_type(
    status: Option<StatusCode>,
    err: Option<&ReqwestError>,
) -> RetryErrorType {
    if let Some(status) = status {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return RetryErrorType::RateLimit;
        }
        if status.is_server_error() {
            return RetryErrorType::ServerError(status.as_u16());
        }
    }

    if let Some(err) = err {
        if err.is_timeout() {
            return RetryErrorType::NetworkTimeout;
        }
        if err.is_connect() {
            return RetryErrorType::NetworkOffline;
        }
    }

    RetryErrorType::NetworkGeneric
}

fn append_operation(buffer: &mut String, operation: &str) {
    if !operation.is_empty() {
        buffer.push_str(" (");
        buffer.push_str(operation);
        buffer.push(')');
    }
}
