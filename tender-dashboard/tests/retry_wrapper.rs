use std::time::Duration;

use tender_dashboard::api::QueryApi;
use tender_dashboard::error::ClientError;
use tender_dashboard::retry::{RetryPolicy, Retrying};

mod support;
use support::{
    QueueApi, bad_request, empty_result, service_unavailable,
};

#[test]
fn delays_are_exponential_and_capped() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
    assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
    assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
    assert_eq!(policy.delay_for(4), Duration::from_millis(8000));
    assert_eq!(policy.delay_for(5), Duration::from_millis(10_000));
    assert_eq!(policy.delay_for(12), Duration::from_millis(10_000));
}

#[tokio::test(start_paused = true)]
async fn returns_the_success_after_transient_failures() {
    let api = QueueApi::new([
        Err(service_unavailable()),
        Err(service_unavailable()),
        Err(service_unavailable()),
        Ok(empty_result()),
    ]);
    let retrying = Retrying::new(api);

    let started = tokio::time::Instant::now();
    let result = retrying.query("SELECT 1", Vec::new()).await;

    assert!(result.is_ok());
    // 1s + 2s + 4s of backoff between the four attempts.
    assert_eq!(started.elapsed(), Duration::from_millis(7000));
}

#[tokio::test(start_paused = true)]
async fn surfaces_the_last_error_after_exactly_four_attempts() {
    let api = QueueApi::new([
        Err(service_unavailable()),
        Err(service_unavailable()),
        Err(service_unavailable()),
        Err(ClientError::Api {
            status: 500,
            message: "still broken".to_string(),
        }),
    ]);
    let retrying = Retrying::new(api);

    let err = retrying
        .query("SELECT 1", Vec::new())
        .await
        .expect_err("budget should run out");

    assert_eq!(retrying_calls(&retrying), 4);
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "still broken");
        }
        other => panic!("expected the last Api error, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn non_retryable_errors_surface_immediately() {
    let api = QueueApi::new([Err(bad_request())]);
    let retrying = Retrying::new(api);

    let started = tokio::time::Instant::now();
    let err = retrying
        .query("", Vec::new())
        .await
        .expect_err("bad request should surface");

    assert_eq!(retrying_calls(&retrying), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(!err.is_retryable());
}

#[tokio::test(start_paused = true)]
async fn each_call_gets_a_fresh_budget() {
    // Two calls, each needing the full three retries: the second only
    // succeeds if the first call's spending didn't carry over.
    let api = QueueApi::new([
        Err(service_unavailable()),
        Err(service_unavailable()),
        Err(service_unavailable()),
        Ok(empty_result()),
        Err(service_unavailable()),
        Err(service_unavailable()),
        Err(service_unavailable()),
        Ok(empty_result()),
    ]);
    let retrying = Retrying::new(api);

    assert!(retrying.query("SELECT 1", Vec::new()).await.is_ok());
    assert!(retrying.query("SELECT 1", Vec::new()).await.is_ok());
    assert_eq!(retrying_calls(&retrying), 8);
}

fn retrying_calls(retrying: &Retrying<QueueApi>) -> u32 {
    retrying.inner().call_count()
}
