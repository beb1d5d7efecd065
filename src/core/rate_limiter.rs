use std::time::Duration;
use tokio::time::sleep;
use rand::Rng;

/// Jittered pause between upstream requests.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    min_ms: u64,
    max_ms: u64,
}

impl RateLimiter {
    /// `max_ms` below `min_ms` is clamped up to `min_ms`.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms: max_ms.max(min_ms) }
    }

    /// No pacing at all (tests, local mirrors).
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    pub fn next_delay(&self) -> Duration {
        let ms = if self.max_ms > self.min_ms {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.min_ms..=self.max_ms)
        } else {
            self.min_ms
        };
        Duration::from_millis(ms)
    }

    /// Wait a random duration inside the configured range.
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}
