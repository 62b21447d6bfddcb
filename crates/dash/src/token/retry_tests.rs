// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;
use crate::test_support::{fast_settings, MockResponse, MockTokenEndpoint};
use crate::token::http_client;

#[test]
fn backoff_doubles_and_caps() {
    let policy = RetryPolicy {
        max_retries: 5,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(500),
    };
    assert_eq!(policy.backoff(0), Duration::from_millis(100));
    assert_eq!(policy.backoff(1), Duration::from_millis(200));
    assert_eq!(policy.backoff(2), Duration::from_millis(400));
    assert_eq!(policy.backoff(3), Duration::from_millis(500));
    assert_eq!(policy.backoff(40), Duration::from_millis(500));
}

#[tokio::test]
async fn retries_transient_failure() -> anyhow::Result<()> {
    let mock = MockTokenEndpoint::start_with(
        vec![MockResponse::status(503, "unavailable")],
        MockResponse::token("tok", Some(3600)),
        Duration::ZERO,
    )
    .await?;
    let client = http_client(Duration::from_secs(5))?;
    let resp = exchange_with_retries(&client, &mock.credentials(), &fast_settings().retry).await?;
    assert_eq!(resp.access_token, "tok");
    assert_eq!(mock.hits(), 2);
    Ok(())
}

#[tokio::test]
async fn permanent_failure_is_not_retried() -> anyhow::Result<()> {
    let mock = MockTokenEndpoint::start(MockResponse::status(401, "denied")).await?;
    let client = http_client(Duration::from_secs(5))?;
    let err = exchange_with_retries(&client, &mock.credentials(), &fast_settings().retry)
        .await
        .expect_err("should fail");
    assert!(matches!(err, TokenError::Rejected { status: 401, .. }));
    assert_eq!(mock.hits(), 1);
    Ok(())
}

#[tokio::test]
async fn gives_up_after_max_retries() -> anyhow::Result<()> {
    let mock = MockTokenEndpoint::start(MockResponse::status(500, "boom")).await?;
    let client = http_client(Duration::from_secs(5))?;
    let policy = fast_settings().retry;
    let err = exchange_with_retries(&client, &mock.credentials(), &policy)
        .await
        .expect_err("should fail");
    assert!(matches!(err, TokenError::Rejected { status: 500, .. }));
    assert_eq!(mock.hits(), policy.max_retries as usize + 1);
    Ok(())
}
