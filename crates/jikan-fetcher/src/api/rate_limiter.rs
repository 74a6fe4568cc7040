//! Rate limiter enforcing a minimum delay between consecutive requests.
//!
//! The upstream API meters clients by request spacing, so every call
//! goes through one limiter instance and waits out the remainder of the
//! interval since the previous request.

use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Minimum-interval rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// Required gap between consecutive requests
    min_interval: Duration,
    /// Last request timestamp
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given minimum interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Wait until the next request is allowed, then record it
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();

            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis(),
                    "Rate limit: waiting before next request"
                );
                sleep(wait_time).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enforces_minimum_interval() {
        let mut limiter = RateLimiter::new(Duration::from_millis(50));

        let start = Instant::now();

        // Three requests cross the interval twice
        for _ in 0..3 {
            limiter.acquire().await;
        }

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(90)); // Allow some tolerance
    }

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));

        let start = Instant::now();
        limiter.acquire().await;

        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
