/// Result of running an operation under a [`super::RetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Succeeded on attempt number `attempts`.
    Success { attempts: u32 },
    /// Gave up after `attempts` calls; `last_error` is the final failure message.
    Failed { attempts: u32, last_error: String },
}

impl RetryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Success { attempts } | RetryOutcome::Failed { attempts, .. } => *attempts,
        }
    }
}
