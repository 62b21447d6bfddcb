// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token exchange with bounded exponential backoff.

use std::time::Duration;

use crate::token::exchange::exchange;
use crate::token::{Credentials, TokenError, TokenResponse};

/// Retry schedule for transient exchange failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Exchange with retries. Only transient errors are retried.
pub async fn exchange_with_retries(
    client: &reqwest::Client,
    credentials: &Credentials,
    policy: &RetryPolicy,
) -> Result<TokenResponse, TokenError> {
    let mut attempt = 0;
    loop {
        match exchange(client, credentials).await {
            Ok(token) => return Ok(token),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = policy.backoff(attempt);
                tracing::debug!(attempt, err = %e, ?delay, "token exchange failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
