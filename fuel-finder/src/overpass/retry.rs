//! Bounded retry with exponential backoff.
//!
//! Transient errors ([`OverpassError::is_transient`]) are retried up to the
//! policy's attempt limit; anything else is returned immediately. The sleep
//! between attempts goes through a [`Delay`] so tests can run without
//! waiting.

use std::future::Future;
use std::time::Duration;

use super::error::OverpassError;

/// Default total number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(2);

/// Retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Growth factor between retries. 1 gives a fixed delay.
    pub multiplier: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts,
            base_delay,
            multiplier,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retries() -> Self {
        Self::new(1, Duration::ZERO, 1)
    }

    /// Delay before retry number `retry` (1-based): `base * multiplier^(retry-1)`.
    ///
    /// Non-decreasing in `retry`; saturates instead of overflowing.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let factor = self.multiplier.max(1).saturating_pow(exponent);
        self.base_delay.saturating_mul(factor)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_BASE, 2)
    }
}

/// Something that can wait.
pub trait Delay: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Real delay backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Delay that returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}

/// Run `operation` until it succeeds, fails fatally, or attempts run out.
///
/// Makes at most `policy.max_attempts` calls and at most one fewer sleeps.
/// When the last attempt fails transiently the error is wrapped in
/// [`OverpassError::RetriesExhausted`].
pub async fn retry_with_backoff<T, F, Fut, D>(
    policy: &RetryPolicy,
    delay: &D,
    mut operation: F,
) -> Result<T, OverpassError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OverpassError>>,
    D: Delay,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_transient() {
            return Err(err);
        }

        if attempt >= max_attempts {
            return Err(OverpassError::RetriesExhausted {
                attempts: attempt,
                last: Box::new(err),
            });
        }

        let wait = policy.delay_for(attempt);
        tracing::warn!(
            attempt,
            max_attempts,
            delay_ms = wait.as_millis() as u64,
            error = %err,
            "transient Overpass error, retrying after backoff"
        );
        delay.sleep(wait).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records requested sleeps without waiting.
    #[derive(Default)]
    struct RecordingDelay {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl Delay for RecordingDelay {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    fn unavailable() -> OverpassError {
        OverpassError::Api {
            status: 503,
            message: "busy".into(),
        }
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(2));
        assert_eq!(policy.multiplier, 2);
    }

    #[test]
    fn exponential_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
    }

    #[test]
    fn fixed_delays() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250), 1);
        assert_eq!(policy.delay_for(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for(4), Duration::from_millis(250));
    }

    #[test]
    fn zero_multiplier_is_fixed() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1), 0);
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
    }

    #[test]
    fn delays_saturate() {
        let policy = RetryPolicy::new(100, Duration::from_secs(2), 10);
        let capped = Duration::from_secs(2).saturating_mul(u32::MAX);
        assert_eq!(policy.delay_for(90), capped);
        assert_eq!(policy.delay_for(91), capped);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let delay = RecordingDelay::default();
        let result = retry_with_backoff(&RetryPolicy::default(), &delay, || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, OverpassError>(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(delay.sleeps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn two_transient_failures_then_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let delay = RecordingDelay::default();
        let result = retry_with_backoff(&RetryPolicy::default(), &delay, || {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err(unavailable()) } else { Ok(n) }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *delay.sleeps.lock().unwrap(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn always_transient_exhausts_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let delay = RecordingDelay::default();
        let result = retry_with_backoff(&RetryPolicy::default(), &delay, || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(unavailable())
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(delay.sleeps.lock().unwrap().len(), 2);
        match result {
            Err(OverpassError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, OverpassError::Api { status: 503, .. }));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = retry_with_backoff(&RetryPolicy::default(), &NoDelay, || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(OverpassError::Malformed {
                    message: "expected value".into(),
                    body: None,
                })
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(OverpassError::Malformed { .. })));
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = retry_with_backoff(&RetryPolicy::default(), &NoDelay, || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(OverpassError::Api {
                    status: 400,
                    message: "parse error".into(),
                })
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(OverpassError::Api { status: 400, .. })));
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(0, Duration::ZERO, 2);
        let result = retry_with_backoff(&policy, &NoDelay, || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(unavailable())
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(OverpassError::RetriesExhausted { attempts: 1, .. })
        ));
    }
}
