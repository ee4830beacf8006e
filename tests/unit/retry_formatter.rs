use std::time::Duration;

use listing_harvester::fetcher::retry_formatter::{
    extract_error_type, RetryContext, RetryErrorType,
};
use reqwest::StatusCode;

fn sample_context(error_type: RetryErrorType) -> RetryContext {
    RetryContext::new(2, Some(5), error_type, "page 3", "HTTP 503 Service Unavailable")
        .with_backoff(Duration::from_secs(4), false)
}

#[test]
fn format_retry_captures_attempt_and_wait() {
    let message = sample_context(RetryErrorType::RateLimit).format_retry();
    assert!(message.contains("attempt 2/5"));
    assert!(message.contains("rate limit exceeded"));
    assert!(message.contains("4.0 seconds"));
    assert!(message.contains("(page 3)"));
    assert!(!message.contains("Retry-After"));
}

#[test]
fn format_success_includes_operation() {
    let message = sample_context(RetryErrorType::NetworkTimeout).format_success();
    assert!(message.contains("succeeded on attempt 2/5"));
    assert!(message.contains("page 3"));
}

#[test]
fn format_failure_lists_suggestions() {
    let output = sample_context(RetryErrorType::ServerError(502)).format_failure();
    assert!(output.contains("gave up after 2 attempts"));
    assert!(output.contains("HTTP 503 Service Unavailable"));
    assert!(output.contains("Request: page 3"));
    assert!(output.contains("degraded"));
    assert!(output.contains("--max-attempts"));
}

#[test]
fn extract_error_type_classifies_status_codes() {
    assert_eq!(
        extract_error_type(Some(StatusCode::TOO_MANY_REQUESTS), None),
        RetryErrorType::RateLimit
    );
    assert_eq!(
        extract_error_type(Some(StatusCode::BAD_GATEWAY), None),
        RetryErrorType::ServerError(502)
    );
    assert_eq!(
        extract_error_type(Some(StatusCode::GATEWAY_TIMEOUT), None),
        RetryErrorType::ServerError(504)
    );
    assert_eq!(extract_error_type(None, None), RetryErrorType::NetworkGeneric);
}

#[test]
fn server_error_descriptions() {
    assert_eq!(RetryErrorType::ServerError(500).description(), "internal server error");
    assert_eq!(RetryErrorType::ServerError(503).description(), "service unavailable");
    assert_eq!(RetryErrorType::ServerError(599).description(), "server error");
}
