use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::item::WorkItem;
use crate::retry::RetryOutcome;

/// One failed item and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    /// Item identifier; empty when the entry had none.
    pub id: String,
    pub reason: String,
}

/// Final partition of a run's items into succeeded and failed, in visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedItem>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` to the list matching `outcome`.
    pub fn record(&mut self, item: &WorkItem, outcome: &RetryOutcome) {
        let id = item.id().unwrap_or_default().to_string();
        match outcome {
            RetryOutcome::Success { .. } => self.succeeded.push(id),
            RetryOutcome::Failed { last_error, .. } => self.failed.push(FailedItem {
                id,
                reason: last_error.clone(),
            }),
        }
    }

    /// Number of items recorded so far.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Write as pretty JSON (the `--report` file).
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json).with_context(|| format!("write report: {}", path.display()))?;
        Ok(())
    }
}
