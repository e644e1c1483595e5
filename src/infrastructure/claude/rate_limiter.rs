use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Minimum-spacing rate limiter for model requests
///
/// A leaky bucket of depth one: each `acquire` waits out whatever is left of
/// `min_interval` since the previous acquisition, then stamps the current
/// time. The first call never waits.
#[derive(Debug)]
pub struct IntervalRateLimiter {
    /// Minimum time between two acquisitions
    min_interval: Duration,
    /// When the last acquisition completed
    last_acquired: Mutex<Option<Instant>>,
}

impl IntervalRateLimiter {
    /// Create a new rate limiter
    ///
    /// # Example
    /// ```
    /// use balance_tuner::infrastructure::claude::rate_limiter::IntervalRateLimiter;
    /// use std::time::Duration;
    ///
    /// let rate_limiter = IntervalRateLimiter::new(Duration::from_secs(1));
    /// ```
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_acquired: Mutex::new(None),
        }
    }

    /// Wait until a request may be issued
    ///
    /// The lock is held across the sleep so concurrent callers queue up
    /// behind each other instead of all firing after the same wait.
    pub async fn acquire(&self) {
        let mut last_acquired = self.last_acquired.lock().await;

        if let Some(last) = *last_acquired {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }

        *last_acquired = Some(Instant::now());
    }

    /// Time a caller would have to wait right now (for testing/monitoring)
    pub async fn remaining_wait(&self) -> Duration {
        let last_acquired = self.last_acquired.lock().await;
        last_acquired.map_or(Duration::ZERO, |last| {
            self.min_interval.saturating_sub(last.elapsed())
        })
    }
}
