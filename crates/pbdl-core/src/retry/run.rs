//! Retry loop: run a closure until success or the policy says stop.

use thiserror::Error;

use super::outcome::RetryOutcome;
use super::policy::{RetryDecision, RetryPolicy};
use crate::delay::Sleeper;
use crate::error::OperationError;

/// All attempts failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("gave up after {attempts} attempt(s): {last_error}")]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: OperationError,
}

/// Runs `f` until it succeeds or attempts are exhausted, sleeping the backoff
/// between attempts. `f` receives the 1-based attempt number.
///
/// Returns the value and the attempt it succeeded on.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &mut dyn Sleeper,
    mut f: F,
) -> Result<(T, u32), RetryExhausted>
where
    F: FnMut(u32) -> Result<T, OperationError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(value) => return Ok((value, attempt)),
            Err(e) => match policy.decide(attempt) {
                RetryDecision::NoRetry => {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: e,
                    })
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, delay_secs = d.as_secs_f64(), error = %e, "retrying");
                    sleeper.sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}

/// Runs a side-effecting operation under `policy` and folds the result into a
/// [`RetryOutcome`]. Never returns an error.
pub fn attempt<F>(policy: &RetryPolicy, sleeper: &mut dyn Sleeper, f: F) -> RetryOutcome
where
    F: FnMut(u32) -> Result<(), OperationError>,
{
    match run_with_retry(policy, sleeper, f) {
        Ok(((), attempts)) => RetryOutcome::Success { attempts },
        Err(RetryExhausted {
            attempts,
            last_error,
        }) => RetryOutcome::Failed {
            attempts,
            last_error: last_error.0,
        },
    }
}
