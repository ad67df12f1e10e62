//! Retry loop: attempt, back off, attempt again until success or the policy says stop.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::attempt::run_attempt;
use super::policy::{RetryDecision, RetryPolicy};
use super::sleep::sleep_or_cancel;
use crate::job::{JobError, JobExecutor};

/// Result of running a job through the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    /// `Ok` on first success, otherwise the last attempt's failure.
    pub result: Result<(), JobError>,
    /// Attempts actually made (at least 1).
    pub attempts: u32,
}

/// Runs `job` until it succeeds or `policy.max_attempts` attempts failed.
///
/// Attempts are strictly sequential. Once `ctx` is cancelled no further
/// attempt is started and any backoff sleep ends early; the report then
/// carries the attempts made so far.
pub async fn run_with_retry<E>(
    policy: &RetryPolicy,
    ctx: &CancellationToken,
    executor: &Arc<E>,
    job: &str,
    attempt_timeout: Duration,
) -> RetryReport
where
    E: JobExecutor + ?Sized + 'static,
{
    let mut attempt = 1u32;
    loop {
        let err = match run_attempt(ctx, Arc::clone(executor), job, attempt_timeout).await {
            Ok(()) => {
                return RetryReport {
                    result: Ok(()),
                    attempts: attempt,
                }
            }
            Err(e) => e,
        };

        match policy.decide(attempt) {
            RetryDecision::NoRetry => {
                return RetryReport {
                    result: Err(err),
                    attempts: attempt,
                }
            }
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(
                    job,
                    error = %err,
                    delay = ?delay,
                    attempt = attempt + 1,
                    retries = policy.max_attempts,
                    "retrying job"
                );
                if !sleep_or_cancel(ctx, delay).await {
                    return RetryReport {
                        result: Err(err),
                        attempts: attempt,
                    };
                }
                attempt += 1;
            }
        }
    }
}
