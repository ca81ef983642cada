//! Minimum-spacing rate limiter shared by every outbound request.

use rand::Rng;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};

/// Random extra spacing drawn uniformly from `min..=max` on every acquire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    pub min: Duration,
    pub max: Duration,
}

impl Jitter {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if max <= min {
            return self.min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Serialises callers so consecutive passes are at least `min_interval` apart.
///
/// The lock is held across the wait, so the elapsed-time check and the
/// timestamp update happen as one step for each caller.
pub struct RateLimiter {
    min_interval: Duration,
    jitter: Option<Jitter>,
    last_request_at: Mutex<Option<Instant>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, Arc::new(SystemClock))
    }

    pub fn with_clock(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_interval,
            jitter: None,
            last_request_at: Mutex::new(None),
            clock,
        }
    }

    pub fn with_jitter(mut self, jitter: Option<Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for the configured spacing, then record the pass.
    pub async fn acquire(&self) -> Instant {
        self.acquire_spaced(self.min_interval).await
    }

    /// Like [`RateLimiter::acquire`], but with a caller-chosen spacing.
    ///
    /// Spacings shorter than `min_interval` are raised to it.
    pub async fn acquire_spaced(&self, interval: Duration) -> Instant {
        let mut last = self.last_request_at.lock().await;

        let jitter = self.jitter.map(|j| j.sample()).unwrap_or_default();
        let required = interval.max(self.min_interval).saturating_add(jitter);

        if let Some(previous) = *last {
            let elapsed = self.clock.now().saturating_duration_since(previous);
            if elapsed < required {
                let wait = required - elapsed;
                info!("Rate limiting: waiting {:.1}s", wait.as_secs_f64());
                self.clock.sleep(wait).await;
            }
        }

        let now = self.clock.now();
        *last = Some(now);
        debug!(?jitter, "rate limiter clearance granted");
        now
    }

    /// Timestamp recorded by the most recent pass, if any.
    pub async fn last_request_at(&self) -> Option<Instant> {
        *self.last_request_at.lock().await
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("min_interval", &self.min_interval)
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}
