//! Start-rate throttle.
//!
//! A fixed pause of `1s / rate` taken by each worker right after it gets its
//! admission slot and before its first attempt. This is not a token bucket:
//! with many workers relative to the rate it only approximates the target
//! and does not enforce a hard ceiling.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::retry::sleep_or_cancel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    interval: Option<Duration>,
}

impl RateLimiter {
    /// Throttle to `rate` starts per second; 0 disables throttling.
    pub fn per_second(rate: u32) -> Self {
        let interval = (rate > 0).then(|| Duration::from_secs(1) / rate);
        Self { interval }
    }

    /// Pause taken before each job's first attempt, if any.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Takes the pause. Returns false if `ctx` was cancelled during it.
    pub async fn pause(&self, ctx: &CancellationToken) -> bool {
        match self.interval {
            Some(d) => sleep_or_cancel(ctx, d).await,
            None => !ctx.is_cancelled(),
        }
    }
}
