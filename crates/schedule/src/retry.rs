//! Bounded retry for transient storage contention.
//!
//! Wraps an entire replan-and-persist sequence. Retries only on
//! [`CoreError::is_contention`]; validation and not-found errors
//! propagate on the first failure. Backoff is linear: base delay times
//! the attempt number.

use std::future::Future;
use std::time::Duration;

use tempo_core::error::CoreError;

/// Retry budget and backoff base.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub retries: u32,
    /// Delay before the first retry; later retries wait multiples of it.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(50),
        }
    }
}

/// Run `op`, retrying on contention up to the policy's budget.
pub async fn with_contention_retry<T, F, Op>(
    policy: &RetryPolicy,
    mut op: Op,
) -> Result<T, CoreError>
where
    Op: FnMut() -> F,
    F: Future<Output = Result<T, CoreError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_contention() && attempt < policy.retries => {
                attempt += 1;
                tracing::warn!(attempt, error = %err, "Storage contention, retrying");
                tokio::time::sleep(policy.base_delay * attempt).await;
            }
            Err(err) => return Err(err),
        }
    }
}
