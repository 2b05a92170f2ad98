//! Bounded retry with exponential backoff and a per-attempt timeout.

use std::{fmt::Display, future::Future, time::Duration};

use tokio::time::{sleep, timeout};
use tracing::{info, warn};

/// How a unit of work is retried.
///
/// Attempts run strictly one after another. Every failure cause (error or
/// timeout) is treated the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Bound on a single attempt.
    pub attempt_timeout: Duration,
}

/// Terminal outcome of an exhausted [`RetryPolicy`].
#[derive(Debug)]
pub enum RetryError<E> {
    /// The final attempt exceeded the attempt timeout.
    Timeout { attempts: u32 },
    /// The final attempt returned an error.
    Failed { attempts: u32, source: E },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Timeout { attempts } | RetryError::Failed { attempts, .. } => *attempts,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RetryError::Timeout { .. })
    }
}

impl<E: Display> Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryError::Timeout { attempts } => write!(f, "timed out after {attempts} attempts"),
            RetryError::Failed { attempts, source } => write!(f, "failed after {attempts} attempts: {source}"),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): `base * 2^(retry - 1)`, capped at `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `work` until it succeeds or the attempts are exhausted.
    ///
    /// `work` receives the 1-based attempt number. An attempt that outlives
    /// `attempt_timeout` is dropped and counts as a failure.
    pub async fn run<T, E, F, Fut>(&self, mut work: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = match timeout(self.attempt_timeout, work(attempt)).await {
                Ok(Ok(value)) => {
                    info!("Attempt {attempt}/{max_attempts} succeeded.");
                    return Ok(value);
                }
                Ok(Err(err)) => {
                    warn!("Attempt {attempt}/{max_attempts} failed: {err}");
                    RetryError::Failed { attempts: attempt, source: err }
                }
                Err(_) => {
                    warn!("Attempt {attempt}/{max_attempts} timed out after {:?}.", self.attempt_timeout);
                    RetryError::Timeout { attempts: attempt }
                }
            };

            if attempt >= max_attempts {
                return Err(outcome);
            }

            let delay = self.delay_for(attempt);
            info!("Retrying in {delay:?} ...");
            sleep(delay).await;

            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use tokio::time::Instant;

    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
            attempt_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = policy();

        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for(3), Duration::from_secs(10));
        assert_eq!(policy.delay_for(40), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_returns_immediately() {
        let start = Instant::now();

        let result: Result<u32, RetryError<String>> = policy().run(|attempt| async move { Ok(attempt) }).await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result = policy()
            .run(|attempt| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if attempt < 3 { Err("upstream unavailable".to_string()) } else { Ok("done") }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_failures_report_last_error() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = policy()
            .run(|attempt| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(format!("failure {attempt}"))
                }
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(err.attempts(), 3);
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "failed after 3 attempts: failure 3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_count_as_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let result: Result<(), RetryError<String>> = policy()
            .run(|_| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    sleep(Duration::from_secs(3600)).await;
                    Ok(())
                }
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.attempts(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Three timeouts plus the 4s and 8s backoff delays.
        assert!(start.elapsed() >= Duration::from_secs(3 * 30 + 4 + 8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_runs_once() {
        let policy = RetryPolicy { max_attempts: 0, ..policy() };
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = policy
            .run(|_| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("nope")
                }
            })
            .await;

        assert_eq!(result.unwrap_err().attempts(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
