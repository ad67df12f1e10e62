//! Bounded worker pool.
//!
//! The dispatcher spawns one task per queued job on the caller's
//! [`TaskTracker`]. Each task waits for an admission slot, takes the
//! rate-limit pause, runs the job through the retry loop and appends one
//! [`JobOutcome`]. At most `workers` tasks hold a slot at any instant.
//!
//! Cancellation: a job that never started an attempt (cancelled while
//! waiting for a slot or during the rate pause) is abandoned and produces no
//! outcome. A job that made at least one attempt is always recorded, with the
//! attempts actually made.

mod gate;
mod outcome;
mod queue;
mod rate;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::{ConfigError, PoolConfig};
use crate::job::{JobExecutor, JobId};
use crate::retry::{run_with_retry, RetryPolicy};

pub use gate::{AdmissionGate, GatePermit};
pub use outcome::{JobOutcome, ResultRecorder, RunSummary};
pub use queue::{job_queue, JobQueue};
pub use rate::RateLimiter;

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// A pool runs exactly one batch.
    #[error("worker pool has already been run")]
    AlreadyRun,
}

/// Shared by every worker task of one run.
#[derive(Debug)]
struct Shared {
    config: PoolConfig,
    retry: RetryPolicy,
    rate: RateLimiter,
    gate: AdmissionGate,
    recorder: ResultRecorder,
}

/// Worker pool for one batch of jobs.
///
/// # Example
///
/// ```ignore
/// let pool = WorkerPool::new(PoolConfig::new(2, 3, 0, Duration::from_secs(5), 42))?;
/// let tracker = TaskTracker::new();
/// pool.run(&ctx, job_queue(urls), Arc::new(HttpFetcher::new()), &tracker).await?;
/// tracker.close();
/// tracker.wait().await;
/// let outcomes = pool.outcomes();
/// ```
#[derive(Debug)]
pub struct WorkerPool {
    shared: Arc<Shared>,
    started: AtomicBool,
}

impl WorkerPool {
    /// Validates `config` and builds the pool. Invalid values are rejected, not clamped.
    pub fn new(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let shared = Shared {
            retry: RetryPolicy::from_config(&config),
            rate: RateLimiter::per_second(config.rate_limit),
            gate: AdmissionGate::new(config.workers),
            recorder: ResultRecorder::new(),
            config,
        };
        Ok(Self {
            shared: Arc::new(shared),
            started: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.shared.retry
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.shared.gate
    }

    /// Outcomes recorded so far, in completion order.
    pub fn outcomes(&self) -> Vec<JobOutcome> {
        self.shared.recorder.snapshot()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_outcomes(&self.outcomes())
    }

    /// Drains `jobs` and spawns one worker per job on `tracker`.
    ///
    /// Returns the number of workers spawned once the queue is exhausted; it
    /// does not wait for them. The queue must be closed (all senders dropped),
    /// otherwise this waits for more jobs. Close and wait on `tracker` to
    /// block until every worker is done.
    pub async fn run<E>(
        &self,
        ctx: &CancellationToken,
        mut jobs: JobQueue,
        executor: Arc<E>,
        tracker: &TaskTracker,
    ) -> Result<usize, PoolError>
    where
        E: JobExecutor + ?Sized + 'static,
    {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(PoolError::AlreadyRun);
        }

        let mut spawned = 0usize;
        while let Some(job) = jobs.recv().await {
            tracing::debug!(job = %job, "spawning worker for job");
            let shared = Arc::clone(&self.shared);
            let ctx = ctx.clone();
            let executor = Arc::clone(&executor);
            tracker.spawn(async move { shared.process_job(ctx, job, executor).await });
            spawned += 1;
        }

        tracing::debug!(
            jobs = spawned,
            workers = self.shared.config.workers,
            "all workers spawned"
        );
        Ok(spawned)
    }
}

impl Shared {
    async fn process_job<E>(&self, ctx: CancellationToken, job: JobId, executor: Arc<E>)
    where
        E: JobExecutor + ?Sized + 'static,
    {
        let Some(_permit) = self.gate.acquire(&ctx).await else {
            tracing::debug!(job = %job, "cancelled before admission; job abandoned");
            return;
        };

        let started = Instant::now();

        if !self.rate.pause(&ctx).await {
            tracing::debug!(job = %job, "cancelled during rate limit pause; job abandoned");
            return;
        }

        let report = run_with_retry(
            &self.retry,
            &ctx,
            &executor,
            &job,
            self.config.attempt_timeout,
        )
        .await;

        let outcome = JobOutcome::from_report(job, report, started.elapsed());
        match &outcome.error {
            None => tracing::debug!(
                job = %outcome.job,
                attempts = outcome.attempts,
                duration = ?outcome.duration,
                "successfully processed job"
            ),
            Some(e) => tracing::error!(
                job = %outcome.job,
                attempts = outcome.attempts,
                error = %e,
                "failed to process job"
            ),
        }
        self.recorder.record(outcome);
    }
}
