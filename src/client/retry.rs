//! Bounded retry with a fixed delay
//!
//! The debugger is driven by a person clicking through supersteps, so a
//! flat delay between attempts is enough; there is no exponential backoff.

use std::future::Future;
use std::time::Duration;

/// Attempt budget for [`fetch_with_retry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Wait between a failed attempt and the next one
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    /// Policy with at least one attempt
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Emitted before every retry
#[derive(Debug)]
pub struct RetryNotice<'a, E> {
    /// 1-based number of the attempt that just failed
    pub attempt: u32,
    /// Attempts still to be made, including the one about to start
    pub remaining: u32,
    pub error: &'a E,
}

/// All attempts failed
#[derive(Debug, thiserror::Error)]
#[error("Gave up after {attempts} attempts: {last_error}")]
pub struct RetryExhausted<E: std::error::Error + 'static> {
    pub attempts: u32,
    #[source]
    pub last_error: E,
}

/// Run `operation` until it succeeds or the policy's attempts run out.
///
/// After each failure except the last, waits `policy.delay` and then calls
/// `on_retry` before trying again. A run that fails `n` times and then
/// succeeds produces exactly `n` notices.
pub async fn fetch_with_retry<T, E, F, Fut, N>(
    policy: RetryPolicy,
    mut operation: F,
    mut on_retry: N,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + 'static,
    N: FnMut(RetryNotice<'_, E>),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(attempt, "Request succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if attempt >= max_attempts => {
                tracing::warn!(attempts = attempt, error = %error, "Giving up on request");
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: error,
                });
            }
            Err(error) => {
                let remaining = max_attempts - attempt;
                tracing::warn!(attempt, remaining, error = %error, "Request failed, will retry");
                tokio::time::sleep(policy.delay).await;
                on_retry(RetryNotice {
                    attempt,
                    remaining,
                    error: &error,
                });
                attempt += 1;
            }
        }
    }
}
