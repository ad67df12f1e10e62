//! One attempt: the job function bounded by the per-attempt timeout.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::job::{JobError, JobExecutor};

/// Runs one attempt of `job` on its own task.
///
/// The executor receives a child of `ctx` that is cancelled when the attempt
/// ends, times out, or `ctx` itself is cancelled. A panic in the executor is
/// reported as [`JobError::Panicked`] instead of tearing down the worker.
pub async fn run_attempt<E>(
    ctx: &CancellationToken,
    executor: Arc<E>,
    job: &str,
    timeout: Duration,
) -> Result<(), JobError>
where
    E: JobExecutor + ?Sized + 'static,
{
    if ctx.is_cancelled() {
        return Err(JobError::Cancelled);
    }

    let attempt_ctx = ctx.child_token();
    let task_ctx = attempt_ctx.clone();
    let job = job.to_string();
    let mut handle = tokio::spawn(async move { executor.execute(task_ctx, job).await });

    let result = tokio::select! {
        joined = &mut handle => match joined {
            Ok(res) => res,
            Err(e) if e.is_panic() => Err(JobError::Panicked(panic_message(e.into_panic()))),
            Err(e) => Err(JobError::Failed(format!("attempt task: {}", e))),
        },
        _ = tokio::time::sleep(timeout) => Err(JobError::Timeout(timeout)),
        _ = ctx.cancelled() => Err(JobError::Cancelled),
    };

    attempt_ctx.cancel();
    handle.abort();
    result
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobId;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    #[tokio::test]
    async fn success_passes_through() {
        let exec = Arc::new(|_ctx: CancellationToken, _job: JobId| async { Ok::<(), JobError>(()) });
        let ctx = CancellationToken::new();
        assert_eq!(run_attempt(&ctx, exec, "a", Duration::from_secs(1)).await, Ok(()));
    }

    #[tokio::test]
    async fn timeout_fires() {
        let exec = Arc::new(|ctx: CancellationToken, _job: JobId| async move {
            ctx.cancelled().await;
            Err::<(), JobError>(JobError::Cancelled)
        });
        let ctx = CancellationToken::new();
        let res = run_attempt(&ctx, exec, "slow", Duration::from_millis(20)).await;
        assert_eq!(res, Err(JobError::Timeout(Duration::from_millis(20))));
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn already_cancelled_context_does_no_work() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let exec = Arc::new(move |_ctx: CancellationToken, _job: JobId| {
            seen.fetch_add(1, Ordering::SeqCst);
            async { Ok::<(), JobError>(()) }
        });
        let ctx = CancellationToken::new();
        ctx.cancel();
        let res = run_attempt(&ctx, exec, "a", Duration::from_secs(1)).await;
        assert_eq!(res, Err(JobError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn outer_cancellation_ends_attempt_promptly() {
        let exec = Arc::new(|_ctx: CancellationToken, _job: JobId| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<(), JobError>(())
        });
        let ctx = CancellationToken::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });
        let start = Instant::now();
        let res = run_attempt(&ctx, exec, "a", Duration::from_secs(60)).await;
        assert_eq!(res, Err(JobError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn panic_becomes_failure() {
        let exec = Arc::new(|_ctx: CancellationToken, job: JobId| async move {
            if job == "boom" {
                panic!("exploded on {}", job);
            }
            Ok::<(), JobError>(())
        });
        let ctx = CancellationToken::new();
        let res = run_attempt(&ctx, exec, "boom", Duration::from_secs(1)).await;
        assert_eq!(res, Err(JobError::Panicked("exploded on boom".to_string())));
    }
}
