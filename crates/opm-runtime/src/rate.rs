//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Tick-loop rate limiting."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

/// Simple async rate limiter that keeps the tick loop on a deterministic
/// interval. Missed ticks are delayed rather than bursted so a stalled task
/// never fires back-to-back updates.
#[derive(Debug)]
pub struct RateLimiter {
    interval: tokio::time::Interval,
}

impl RateLimiter {
    pub fn new(period: Duration) -> Self {
        // First tick lands one full period after startup, matching a plain
        // repeating timer. tokio intervals otherwise fire immediately.
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ticks_do_not_burst_after_a_stall() {
        tokio::time::pause();
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        limiter.tick().await;
        tokio::time::advance(Duration::from_millis(350)).await;
        let first = limiter.tick().await;
        let second = limiter.tick().await;
        assert!(second.duration_since(first) >= Duration::from_millis(100));
    }
}
