use std::time::Duration;

use crate::config::PoolConfig;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; the attempt limit is reached.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff with a fixed additive jitter.
///
/// `delay(n) = 2^n * base + (seed % 100) * jitter_unit`. The jitter term is
/// computed once from the seed, so every attempt of every job in a pool gets
/// the same offset; callers wanting different jitter vary the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Unit of the exponential term.
    pub base_delay: Duration,
    /// Constant jitter added to every delay.
    pub jitter: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, jitter_unit: Duration, seed: u64) -> Self {
        let jitter = jitter_unit.saturating_mul((seed % 100) as u32);
        Self {
            max_attempts,
            base_delay,
            jitter,
        }
    }

    pub fn from_config(cfg: &PoolConfig) -> Self {
        Self::new(cfg.retries, cfg.backoff_base, cfg.jitter_unit, cfg.seed)
    }

    /// Delay to wait after failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(exp).saturating_add(self.jitter)
    }

    /// What to do after attempt `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff(attempt))
    }
}
