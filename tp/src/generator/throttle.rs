//! Minimum-interval throttle shared by every caller of the generator

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum gap between successful generator calls
///
/// Share one instance through an `Arc` to throttle process-wide, or give
/// independent builds their own. Time comes from tokio's clock so tests can
/// run with paused time.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_success: Mutex<Option<Instant>>,
}

/// Exclusive permit to call the generator
///
/// The throttle stays locked while the guard lives, so concurrent callers
/// queue behind the call in flight and always see the latest timestamp.
#[derive(Debug)]
pub struct ThrottleGuard<'a> {
    last_success: MutexGuard<'a, Option<Instant>>,
}

impl ThrottleGuard<'_> {
    /// Record a successful call; the next permit waits a full interval from now
    pub fn mark(mut self) {
        debug!("ThrottleGuard::mark: called");
        *self.last_success = Some(Instant::now());
    }
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        debug!(?min_interval, "Throttle::new: called");
        Self {
            min_interval,
            last_success: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    fn wait_needed(&self, last_success: Option<Instant>) -> Duration {
        match last_success {
            Some(last) => (last + self.min_interval).saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        }
    }

    /// Wait until a call is allowed, then hold the permit
    pub async fn acquire(&self) -> ThrottleGuard<'_> {
        debug!("Throttle::acquire: called");
        let last_success = self.last_success.lock().await;

        let wait = self.wait_needed(*last_success);
        if !wait.is_zero() {
            debug!(?wait, "Throttle::acquire: interval not elapsed, sleeping");
            tokio::time::sleep(wait).await;
        }

        ThrottleGuard { last_success }
    }

    /// Take the permit only if a call is allowed right now
    ///
    /// Returns how long to wait otherwise. When another call is in flight the
    /// wait is reported as one full interval.
    pub fn try_acquire(&self) -> Result<ThrottleGuard<'_>, Duration> {
        debug!("Throttle::try_acquire: called");
        let Ok(last_success) = self.last_success.try_lock() else {
            debug!("Throttle::try_acquire: call in flight");
            return Err(self.min_interval);
        };

        let wait = self.wait_needed(*last_success);
        if !wait.is_zero() {
            debug!(?wait, "Throttle::try_acquire: interval not elapsed");
            return Err(wait);
        }

        Ok(ThrottleGuard { last_success })
    }
}
