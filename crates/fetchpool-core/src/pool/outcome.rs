//! Per-job outcomes and the append-only collection the workers share.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::job::{JobError, JobId};
use crate::retry::RetryReport;

/// Final record of one job. Never modified after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub job: JobId,
    pub success: bool,
    /// Last failure; `None` when `success` is true.
    pub error: Option<JobError>,
    pub attempts: u32,
    /// From slot acquisition to the end of the last attempt, millisecond precision.
    pub duration: Duration,
}

impl JobOutcome {
    pub fn from_report(job: JobId, report: RetryReport, elapsed: Duration) -> Self {
        let duration = round_to_millis(elapsed);
        match report.result {
            Ok(()) => Self {
                job,
                success: true,
                error: None,
                attempts: report.attempts,
                duration,
            },
            Err(e) => Self {
                job,
                success: false,
                error: Some(e),
                attempts: report.attempts,
                duration,
            },
        }
    }
}

fn round_to_millis(d: Duration) -> Duration {
    let micros = d.as_micros();
    let millis = (micros + 500) / 1000;
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}

/// Mutex-guarded, append-only outcome list. Order is completion order.
#[derive(Debug, Default)]
pub struct ResultRecorder {
    outcomes: Mutex<Vec<JobOutcome>>,
}

impl ResultRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<JobOutcome>> {
        // Appends cannot leave the vector half-written, so a poisoned lock is still usable.
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, outcome: JobOutcome) {
        self.lock().push(outcome);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<JobOutcome> {
        self.lock().clone()
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[JobOutcome]) -> Self {
        let successful = outcomes.iter().filter(|o| o.success).count();
        Self {
            total: outcomes.len(),
            successful,
            failed: outcomes.len() - successful,
        }
    }
}
