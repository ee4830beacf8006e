//! Integration tests for HTTP retry behavior against a local mock server

use std::time::{Duration, Instant};

use listing_harvester::fetcher::{FetchOutcome, FetcherError};
use listing_harvester::harvester::RetryPolicy;
use mockito::{Matcher, Server};
use reqwest::StatusCode;
use serde_json::json;

use crate::common::{fast_retry_policy, test_client, ENDPOINT_PATH};

#[tokio::test]
async fn test_retries_503_until_success() {
    let mut server = Server::new_async().await;

    // Mocks with unmet expectations take precedence, in creation order
    let unavailable = server
        .mock("GET", ENDPOINT_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(2)
        .create_async()
        .await;
    let ok = server
        .mock("GET", ENDPOINT_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"job_id": "1"}]"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url(), fast_retry_policy());
    let started = Instant::now();
    let outcome = client
        .get(&[("page", "1".to_string())], "page 1")
        .await
        .expect("transient errors must not surface");

    // Two backoff sleeps without jitter: 10 ms, then 20 ms
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(30), "{elapsed:?}");

    assert_eq!(
        outcome,
        FetchOutcome::Success {
            body: Some(json!([{"job_id": "1"}])),
            attempts: 3,
        }
    );
    unavailable.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_retry_after_header_overrides_backoff() {
    let mut server = Server::new_async().await;

    let limited = server
        .mock("GET", ENDPOINT_PATH)
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("Retry-After", "0")
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("GET", ENDPOINT_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    // Computed backoff would be 30 s; the header says retry immediately
    let policy = RetryPolicy {
        initial_backoff: Duration::from_secs(30),
        ..fast_retry_policy()
    };
    let client = test_client(&server.url(), policy);

    let started = Instant::now();
    let outcome = tokio::time::timeout(Duration::from_secs(10), client.get(&[], "overview 1"))
        .await
        .expect("Retry-After must be honored")
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(matches!(outcome, FetchOutcome::Success { attempts: 2, .. }));
    limited.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_non_retryable_status_is_rejected_without_retry() {
    let mut server = Server::new_async().await;

    let forbidden = server
        .mock("GET", ENDPOINT_PATH)
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"message": "invalid api key"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url(), fast_retry_policy());
    let outcome = client.get(&[], "page 1").await.unwrap();

    assert_eq!(
        outcome,
        FetchOutcome::Rejected {
            status: StatusCode::FORBIDDEN
        }
    );
    assert_eq!(outcome.into_body(), None);
    forbidden.assert_async().await;
}

#[tokio::test]
async fn test_malformed_json_is_empty_success() {
    let mut server = Server::new_async().await;

    let garbage = server
        .mock("GET", ENDPOINT_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url(), fast_retry_policy());
    let outcome = client.get(&[], "page 1").await.unwrap();

    assert_eq!(
        outcome,
        FetchOutcome::Success {
            body: None,
            attempts: 1
        }
    );
    garbage.assert_async().await;
}

#[tokio::test]
async fn test_attempt_cap_exhausts() {
    let mut server = Server::new_async().await;

    let failing = server
        .mock("GET", ENDPOINT_PATH)
        .match_query(Matcher::Any)
        .with_status(502)
        .expect(2)
        .create_async()
        .await;

    let client = test_client(
        &server.url(),
        fast_retry_policy().with_max_attempts(Some(2)),
    );
    let err = client.get(&[], "page 1").await.unwrap_err();

    match err {
        FetcherError::RetriesExhausted {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 2);
            assert!(last_error.contains("502"), "{last_error}");
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    failing.assert_async().await;
}

#[tokio::test]
async fn test_query_parameters_are_sent() {
    let mut server = Server::new_async().await;

    let page = server
        .mock("GET", ENDPOINT_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), "k".into()),
            Matcher::UrlEncoded("field".into(), "data engineer".into()),
            Matcher::UrlEncoded("page".into(), "7".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url(), fast_retry_policy());
    let params = [
        ("api_key", "k".to_string()),
        ("field", "data engineer".to_string()),
        ("page", "7".to_string()),
    ];
    let outcome = client.get(&params, "page 7").await.unwrap();

    assert_eq!(outcome.into_body(), Some(json!([])));
    page.assert_async().await;
}
