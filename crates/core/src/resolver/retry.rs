//! Parameterized retry policy shared by both resolution modes.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Fixed-interval retry: up to `max_attempts` rounds with `backoff` between
/// failed rounds. The interval is flat rather than exponential; the expected
/// failure is a transient empty result, not overload.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Drive `attempt` until it yields a value, an error, or the attempt
    /// budget runs out. `Ok(None)` from an attempt means "retry"; errors
    /// abort immediately. No backoff is taken after the final attempt.
    pub async fn run<T, E, F, Fut>(&self, mut attempt: F) -> Result<Option<T>, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        for round in 1..=self.max_attempts {
            if let Some(value) = attempt(round).await? {
                return Ok(Some(value));
            }

            if round < self.max_attempts {
                debug!(
                    round = round,
                    backoff_ms = self.backoff.as_millis() as u64,
                    "Attempt produced nothing, backing off"
                );
                tokio::time::sleep(self.backoff).await;
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result: Result<Option<u32>, ()> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(Some(7)) }
            })
            .await;

        assert_eq!(result.unwrap(), Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausts_attempt_budget() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result: Result<Option<u32>, ()> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(None) }
            })
            .await;

        assert_eq!(result.unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_succeeds_on_later_round() {
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result: Result<Option<u32>, ()> = policy
            .run(|round| async move { Ok((round == 2).then_some(round)) })
            .await;

        assert_eq!(result.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_error_aborts_immediately() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result: Result<Option<u32>, &str> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("boom") }
            })
            .await;

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_backoff_is_bounded() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        let start = tokio::time::Instant::now();

        let result: Result<Option<u32>, ()> = policy.run(|_| async { Ok(None) }).await;
        assert_eq!(result.unwrap(), None);

        // Two sleeps between three rounds, none after the last.
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_zero_attempts_clamped_to_one() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(0, Duration::ZERO);

        let result: Result<Option<u32>, ()> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(None) }
            })
            .await;

        assert_eq!(result.unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
