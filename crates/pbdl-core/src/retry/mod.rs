//! Retry and backoff policy.
//!
//! Bounded attempts with linear backoff (`base_delay * attempt`). Failures are
//! captured into a [`RetryOutcome`] value instead of propagating, so callers
//! can aggregate per-item results without unwinding the run.

mod outcome;
mod policy;
mod run;

pub use outcome::RetryOutcome;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::{attempt, run_with_retry, RetryExhausted};
