//! Retry and backoff.
//!
//! Runs a job's attempts one after another until the first success or until
//! the attempt limit is reached, sleeping an exponential delay plus a fixed,
//! seed-derived jitter between failed attempts. Every wait observes the
//! shared cancellation token.

mod attempt;
mod policy;
mod run;
mod sleep;

pub use attempt::run_attempt;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryReport};
pub use sleep::sleep_or_cancel;
