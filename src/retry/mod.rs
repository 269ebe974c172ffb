//! Bounded retry execution for API operations
//!
//! Every remote call in this crate goes through [`retry`]: a fixed number of
//! attempts separated by a fixed delay. There is deliberately no exponential
//! backoff or jitter; call sites that need a longer cooldown (node status and
//! link, where the server throws 5xx under load) use a policy with a longer
//! delay instead.

use crate::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Attempt count and inter-attempt delay for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Create a policy from an attempt count and a delay in seconds
    pub fn new(attempts: u32, delay_secs: u64) -> Self {
        Self {
            attempts,
            delay: Duration::from_secs(delay_secs),
        }
    }
}

/// Run `operation` under `policy`, returning the first success or the last
/// error once all attempts are spent.
///
/// The delay is slept exactly once per failed attempt that still has a
/// retry remaining, so an operation failing `k` times before succeeding
/// sleeps `k` times.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, name: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts.max(1);

    for attempt in 1..=attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", name, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < attempts => {
                warn!(
                    "{} failed: {}. Retrying in {}s... ({}/{})",
                    name,
                    e,
                    policy.delay.as_secs(),
                    attempt,
                    attempts
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => {
                debug!("{} failed after {} attempts", name, attempts);
                return Err(e);
            }
        }
    }

    unreachable!("retry loop always returns")
}
