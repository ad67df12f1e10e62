//! Run the pool over the URL list and report the outcome.

use anyhow::Result;
use fetchpool_core::fetch::HttpFetcher;
use fetchpool_core::pool::{job_queue, RunSummary, WorkerPool};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::settings::Settings;
use super::shutdown;

pub async fn run_fetch(settings: &Settings) -> Result<RunSummary> {
    let pool = WorkerPool::new(settings.pool.clone())?;
    tracing::debug!(
        workers = settings.pool.workers,
        retries = settings.pool.retries,
        rps = settings.pool.rate_limit,
        base_seed = settings.base_seed,
        seed = settings.pool.seed,
        "worker pool configuration"
    );

    let ctx = CancellationToken::new();
    shutdown::spawn_signal_listener(ctx.clone());

    tracing::info!("starting worker pool execution");
    let tracker = TaskTracker::new();
    pool.run(
        &ctx,
        job_queue(settings.urls.clone()),
        Arc::new(HttpFetcher::new()),
        &tracker,
    )
    .await?;
    tracker.close();
    tracker.wait().await;
    // Stops the signal listener.
    ctx.cancel();

    let outcomes = pool.outcomes();
    let summary = RunSummary::from_outcomes(&outcomes);
    tracing::info!(
        total_jobs = summary.total,
        successful = summary.successful,
        failed = summary.failed,
        "all tasks completed"
    );

    for o in outcomes.iter().filter(|o| !o.success) {
        let reason = o
            .error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_default();
        println!(
            "FAILED {} after {} attempt(s) in {:?}: {}",
            o.job, o.attempts, o.duration, reason
        );
    }
    println!(
        "{} job(s): {} successful, {} failed",
        summary.total, summary.successful, summary.failed
    );
    if summary.total < settings.urls.len() {
        println!(
            "{} job(s) not started (cancelled)",
            settings.urls.len() - summary.total
        );
    }
    Ok(summary)
}
