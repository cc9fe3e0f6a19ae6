//! Exponential-backoff retry wrapper over the query API.
//!
//! This is the browser side's only defense against a gateway that is
//! mid-reconnect: the server answers 503 immediately rather than queueing,
//! so the client absorbs the window by waiting and retrying.

use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use serde_json::Value;
use tender_model::QueryResult;

use crate::api::QueryApi;
use crate::error::ClientError;

/// Capped exponential backoff: delay before attempt `k` (k >= 1) is
/// `min(base * 2^(k-1), cap)`. No jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry attempt `attempt` (1-based): 1s, 2s, 4s, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(31));
        exp.min(self.max_delay)
    }
}

/// Wraps a [`QueryApi`] so every call carries its own retry budget.
///
/// The budget is per call: a success on any attempt leaves the next call
/// with the full budget again. Once the budget is exhausted the last error
/// surfaces unchanged. Non-retryable errors (4xx, validation) surface
/// immediately without spending budget.
#[derive(Debug)]
pub struct Retrying<A> {
    inner: A,
    policy: RetryPolicy,
}

impl<A: QueryApi> Retrying<A> {
    pub fn new(inner: A) -> Self {
        Self::with_policy(inner, RetryPolicy::default())
    }

    pub fn with_policy(inner: A, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: QueryApi> QueryApi for Retrying<A> {
    async fn query(
        &self,
        text: &str,
        params: Vec<Value>,
    ) -> Result<QueryResult, ClientError> {
        let mut attempt = 0u32;
        loop {
            match self.inner.query(text, params.clone()).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if !err.is_retryable()
                        || attempt >= self.policy.max_retries
                    {
                        return Err(err);
                    }
                    attempt += 1;
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "query failed ({err}), retry {attempt}/{} in {}ms",
                        self.policy.max_retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
