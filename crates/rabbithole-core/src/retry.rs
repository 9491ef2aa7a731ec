//! Retry with exponential backoff for port calls.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PortError;

/// Bounded retry schedule for throttled and transient port failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles afterwards.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}
fn default_initial_backoff_ms() -> u64 {
    500
}
fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryPolicy {
    /// A policy that retries without sleeping. Used by tests and offline ports.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    /// Delay before attempt `attempt + 1`, where `attempt` counts from 1.
    pub fn backoff_for(&self, attempt: u32, err: &PortError) -> Duration {
        let max = Duration::from_millis(self.max_backoff_ms);
        if let PortError::RateLimited {
            retry_after: Some(after),
            ..
        } = err
        {
            return (*after).min(max);
        }
        let exp = attempt.saturating_sub(1).min(31);
        let ms = self.initial_backoff_ms.saturating_mul(1u64 << exp);
        Duration::from_millis(ms).min(max)
    }

    /// Run `call` until it succeeds, fails with a non-retryable error, or
    /// the attempt budget is spent. The last error is returned as-is.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, PortError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PortError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.backoff_for(attempt, &err);
                    warn!(
                        "{} failed ({}), retry {}/{} in {:?}",
                        operation,
                        err,
                        attempt,
                        max_attempts - 1,
                        delay
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn throttled() -> PortError {
        PortError::RateLimited {
            message: "quota".into(),
            retry_after: None,
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff_ms: 100,
            max_backoff_ms: 1000,
        };
        let err = PortError::Transport("reset".into());
        assert_eq!(policy.backoff_for(1, &err), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(2, &err), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3, &err), Duration::from_millis(400));
        assert_eq!(policy.backoff_for(5, &err), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(40, &err), Duration::from_millis(1000));
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let policy = RetryPolicy::default();
        let err = PortError::RateLimited {
            message: "slow down".into(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(policy.backoff_for(1, &err), Duration::from_secs(2));

        let err = PortError::RateLimited {
            message: "slow down".into(),
            retry_after: Some(Duration::from_secs(600)),
        };
        assert_eq!(policy.backoff_for(1, &err), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_recovers_after_throttling() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(5);
        let result = policy
            .run("fetch", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(throttled())
                } else {
                    Ok(42)
                }
            })
            .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_authorization_is_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(5);
        let result: Result<(), _> = policy
            .run("fetch", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(PortError::Authorization("denied".into()))
            })
            .await;
        assert!(matches!(result, Err(PortError::Authorization(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(3);
        let result: Result<(), _> = policy
            .run("fetch", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(throttled())
            })
            .await;
        assert!(matches!(result, Err(PortError::RateLimited { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_calls_once() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(0);
        let result = policy
            .run("fetch", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, PortError>("ok")
            })
            .await;
        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
