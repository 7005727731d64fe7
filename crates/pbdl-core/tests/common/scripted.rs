//! In-process provider with per-item scripted failures, plus an event recorder.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use pbdl_core::error::{MetadataLookupError, OperationError};
use pbdl_core::item::{ItemMetadata, WorkItem};
use pbdl_core::orchestrator::{PauseKind, RunEvent, RunObserver};
use pbdl_core::progress::TransferEvent;
use pbdl_core::provider::MediaProvider;

#[derive(Default)]
pub struct ScriptedProvider {
    /// id -> number of leading failed calls (u32::MAX = always fails).
    failures: HashMap<String, u32>,
    /// id -> size estimate returned by resolve.
    sizes: HashMap<String, u64>,
    calls: RefCell<HashMap<String, u32>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_first(mut self, id: &str, n: u32) -> Self {
        self.failures.insert(id.to_string(), n);
        self
    }

    pub fn always_fail(self, id: &str) -> Self {
        self.fail_first(id, u32::MAX)
    }

    pub fn with_size(mut self, id: &str, size: u64) -> Self {
        self.sizes.insert(id.to_string(), size);
        self
    }

    pub fn calls(&self, id: &str) -> u32 {
        self.calls.borrow().get(id).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> u32 {
        self.calls.borrow().values().sum()
    }
}

impl MediaProvider for ScriptedProvider {
    fn resolve(&self, item: &WorkItem) -> Result<ItemMetadata, MetadataLookupError> {
        let id = item.id().unwrap_or_default();
        match self.sizes.get(id) {
            Some(size) => Ok(ItemMetadata {
                title: Some(format!("Resolved {id}")),
                size_estimate: Some(*size),
            }),
            None => Err(MetadataLookupError(format!("no metadata for {id}"))),
        }
    }

    fn perform(
        &self,
        item: &WorkItem,
        on_event: &mut dyn FnMut(TransferEvent),
    ) -> Result<(), OperationError> {
        let id = item.id().unwrap_or_default().to_string();
        let n = {
            let mut calls = self.calls.borrow_mut();
            let c = calls.entry(id.clone()).or_insert(0);
            *c += 1;
            *c
        };
        if let Some(size) = self.sizes.get(&id) {
            on_event(TransferEvent::Downloading {
                downloaded_bytes: size / 2,
            });
        }
        match self.failures.get(&id) {
            Some(limit) if n <= *limit => Err(OperationError::new(format!(
                "ERROR: [youtube] {id}: Video unavailable"
            ))),
            _ => {
                on_event(TransferEvent::Finished);
                Ok(())
            }
        }
    }
}

/// Owned copy of the interesting parts of each event.
#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    RunStarted(usize, usize),
    BatchStarted(usize, usize),
    ItemStarted(String),
    Progress(String, f64),
    ItemFinished(String, bool),
    Pause(PauseKind, Duration),
    RunFinished(usize, usize),
}

#[derive(Default)]
pub struct RecordingObserver {
    pub events: Vec<Seen>,
}

impl RecordingObserver {
    pub fn pauses(&self, kind: PauseKind) -> Vec<Duration> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Seen::Pause(k, d) if *k == kind => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn progress_for(&self, id: &str) -> Vec<f64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Seen::Progress(i, f) if i == id => Some(*f),
                _ => None,
            })
            .collect()
    }
}

fn key(item: &WorkItem) -> String {
    item.id().unwrap_or_default().to_string()
}

impl RunObserver for RecordingObserver {
    fn on_event(&mut self, event: &RunEvent<'_>) {
        let seen = match event {
            RunEvent::RunStarted { items, batches } => Seen::RunStarted(*items, *batches),
            RunEvent::BatchStarted { index, total, .. } => Seen::BatchStarted(*index, *total),
            RunEvent::ItemStarted { item } => Seen::ItemStarted(key(item)),
            RunEvent::ItemProgress { item, fraction } => Seen::Progress(key(item), *fraction),
            RunEvent::ItemFinished { item, outcome } => {
                Seen::ItemFinished(key(item), outcome.is_success())
            }
            RunEvent::Pausing { kind, duration } => Seen::Pause(*kind, *duration),
            RunEvent::RunFinished { succeeded, failed } => Seen::RunFinished(*succeeded, *failed),
        };
        self.events.push(seen);
    }
}
