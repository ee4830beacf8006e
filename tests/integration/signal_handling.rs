use std::time::Duration;

use listing_harvester::fetcher::FetcherError;
use listing_harvester::harvester::RetryPolicy;
use listing_harvester::shutdown::{sleep_unless_shutdown, ShutdownCoordinator, ShutdownRequested};
use mockito::{Matcher, Server};

use crate::common::{fast_retry_policy, test_client, ENDPOINT_PATH};

#[tokio::test]
async fn shutdown_notifies_waiters() {
    let shutdown = ShutdownCoordinator::shared();
    let waiter = {
        let handle = shutdown.clone();
        tokio::spawn(async move {
            handle.wait_for_shutdown().await;
            true
        })
    };

    // Give the task time to start waiting
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.request_shutdown();

    let result = tokio::time::timeout(Duration::from_secs(1), waiter).await;
    assert!(result.is_ok());
}

/// A request made before anyone waits must still be observed
#[tokio::test]
async fn shutdown_requested_before_wait_no_deadlock() {
    let shutdown = ShutdownCoordinator::shared();
    shutdown.request_shutdown();

    let handle = shutdown.clone();
    let waiter = tokio::spawn(async move {
        handle.wait_for_shutdown().await;
        true
    });

    let result = tokio::time::timeout(Duration::from_secs(1), waiter).await;
    assert!(
        result.is_ok(),
        "wait_for_shutdown() deadlocked despite shutdown already requested"
    );
}

#[tokio::test]
async fn shutdown_concurrent_waiters_all_notified() {
    let shutdown = ShutdownCoordinator::shared();

    let mut waiters = Vec::new();
    for _ in 0..10 {
        let handle = shutdown.clone();
        waiters.push(tokio::spawn(async move {
            handle.wait_for_shutdown().await;
        }));
    }

    tokio::time::sleep(Duration::from_millis(10)).await;
    shutdown.request_shutdown();

    for waiter in waiters {
        let result = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(result.is_ok(), "A waiter was not notified of shutdown");
    }
}

#[tokio::test]
async fn pacing_sleep_is_cut_short() {
    let shutdown = ShutdownCoordinator::shared();
    let handle = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.request_shutdown();
    });

    let start = tokio::time::Instant::now();
    let result = sleep_unless_shutdown(Some(&shutdown), Duration::from_secs(60)).await;

    assert_eq!(result, Err(ShutdownRequested));
    assert!(start.elapsed() < Duration::from_secs(5), "{:?}", start.elapsed());
}

#[tokio::test]
async fn retry_backoff_is_interrupted() {
    let mut server = Server::new_async().await;
    let _unavailable = server
        .mock("GET", ENDPOINT_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let policy = RetryPolicy {
        initial_backoff: Duration::from_secs(30),
        max_backoff: Duration::from_secs(30),
        ..fast_retry_policy()
    };
    let shutdown = ShutdownCoordinator::shared();
    let client = test_client(&server.url(), policy).with_shutdown(Some(shutdown.clone()));

    let handle = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.request_shutdown();
    });

    let result = tokio::time::timeout(Duration::from_secs(10), client.get(&[], "page 1"))
        .await
        .expect("backoff sleep must observe shutdown");

    assert!(matches!(result, Err(FetcherError::Interrupted)), "{result:?}");
}
