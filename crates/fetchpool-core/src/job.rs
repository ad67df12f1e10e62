//! The unit of work the pool executes.
//!
//! A job is an opaque string identifier; the pool hands it to a
//! [`JobExecutor`] together with a cancellation token and records the result.
//! The pool never looks inside the identifier.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Opaque job identifier (for the fetch job, a URL).
pub type JobId = String;

/// Failure of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    /// Server answered with a status other than 200.
    #[error("HTTP {status}: {reason}")]
    Http { status: u32, reason: String },
    /// Connection, DNS or protocol failure before a response was received.
    #[error("transport: {0}")]
    Transport(String),
    /// Response headers arrived but reading the body failed.
    #[error("reading body: {0}")]
    Body(String),
    /// The per-attempt timeout fired.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
    /// The shared context was cancelled.
    #[error("cancelled")]
    Cancelled,
    /// The job function panicked.
    #[error("job panicked: {0}")]
    Panicked(String),
    /// Any other caller-defined failure.
    #[error("{0}")]
    Failed(String),
}

/// Capability the pool runs for every attempt of every job.
///
/// Implementations must return promptly once `ctx` is cancelled; the pool
/// cancels it when the per-attempt timeout fires or the run is shut down.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    async fn execute(&self, ctx: CancellationToken, job: JobId) -> Result<(), JobError>;
}

#[async_trait]
impl<F, Fut> JobExecutor for F
where
    F: Fn(CancellationToken, JobId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    async fn execute(&self, ctx: CancellationToken, job: JobId) -> Result<(), JobError> {
        (self)(ctx, job).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display_carries_status_and_reason() {
        let e = JobError::Http {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(e.to_string(), "HTTP 404: Not Found");
    }

    #[tokio::test]
    async fn closures_are_executors() {
        let exec = |_ctx: CancellationToken, job: JobId| async move {
            if job == "ok" {
                Ok(())
            } else {
                Err(JobError::Failed(format!("bad job {}", job)))
            }
        };
        let ctx = CancellationToken::new();
        assert!(exec.execute(ctx.clone(), "ok".to_string()).await.is_ok());
        assert_eq!(
            exec.execute(ctx, "nope".to_string()).await,
            Err(JobError::Failed("bad job nope".to_string()))
        );
    }
}
