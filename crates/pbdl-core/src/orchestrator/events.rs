//! Events emitted while a run progresses, for UI display.

use std::time::Duration;

use crate::item::WorkItem;
use crate::progress::ProgressSink;
use crate::retry::RetryOutcome;

/// Which of the two pause points a pause belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    BetweenItems,
    BetweenBatches,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent<'a> {
    RunStarted {
        items: usize,
        batches: usize,
    },
    /// `index` is 1-based.
    BatchStarted {
        index: usize,
        total: usize,
        size: usize,
    },
    ItemStarted {
        item: &'a WorkItem,
    },
    ItemProgress {
        item: &'a WorkItem,
        fraction: f64,
    },
    ItemFinished {
        item: &'a WorkItem,
        outcome: &'a RetryOutcome,
    },
    Pausing {
        kind: PauseKind,
        duration: Duration,
    },
    RunFinished {
        succeeded: usize,
        failed: usize,
    },
}

/// Receives run events. Called on the run's thread; keep handlers short.
pub trait RunObserver {
    fn on_event(&mut self, event: &RunEvent<'_>);
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn on_event(&mut self, _event: &RunEvent<'_>) {}
}

/// Forwards an item's progress fractions to the observer as `ItemProgress`.
pub(super) struct ObserverProgress<'o, 'i> {
    pub(super) observer: &'o mut dyn RunObserver,
    pub(super) item: &'i WorkItem,
}

impl ProgressSink for ObserverProgress<'_, '_> {
    fn report(&mut self, fraction: f64) {
        self.observer.on_event(&RunEvent::ItemProgress {
            item: self.item,
            fraction,
        });
    }
}
