//! Pre-populated, closed job queue.

use tokio::sync::mpsc;

use crate::job::JobId;

/// Receiving end of a job queue. The pool drains it until every sender is gone.
pub type JobQueue = mpsc::Receiver<JobId>;

/// Builds a queue holding `jobs` in order, with the sending side already closed.
pub fn job_queue<I>(jobs: I) -> JobQueue
where
    I: IntoIterator,
    I::Item: Into<JobId>,
{
    let jobs: Vec<JobId> = jobs.into_iter().map(Into::into).collect();
    let (tx, rx) = mpsc::channel(jobs.len().max(1));
    for job in jobs {
        // Capacity covers every job and `rx` is alive, so this cannot fail.
        let _ = tx.try_send(job);
    }
    rx
}
