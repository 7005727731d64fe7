//! Run loop: batches in order, items in order, pauses between both.

use rand::RngCore;
use std::num::NonZeroUsize;

use super::events::{ObserverProgress, PauseKind, RunEvent, RunObserver};
use super::result::RunResult;
use crate::batch::partition;
use crate::delay::{DelayRange, Sleeper};
use crate::error::RunError;
use crate::fetcher::ItemFetcher;
use crate::item::WorkItem;
use crate::provider::MediaProvider;
use crate::retry::{RetryOutcome, RetryPolicy};

/// Run-level knobs, validated (see `RunSettings::from_config`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSettings {
    pub batch_size: NonZeroUsize,
    /// Pause after every item.
    pub item_delay: DelayRange,
    /// Pause after every batch but the last.
    pub batch_delay: DelayRange,
    pub retry: RetryPolicy,
}

/// Where the orchestrator is in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    /// 1-based batch index.
    FetchingBatch(usize),
    PausingBetweenItems,
    PausingBetweenBatches,
    Done,
}

/// Injected side effects for a run: blocking sleep, randomness, event sink.
pub struct RunEnv<'a> {
    pub sleeper: &'a mut dyn Sleeper,
    pub rng: &'a mut dyn RngCore,
    pub observer: &'a mut dyn RunObserver,
}

pub struct BatchOrchestrator<'p> {
    fetcher: ItemFetcher<'p>,
    settings: RunSettings,
    phase: RunPhase,
}

impl<'p> BatchOrchestrator<'p> {
    pub fn new(provider: &'p dyn MediaProvider, settings: RunSettings) -> Self {
        Self {
            fetcher: ItemFetcher::new(provider, settings.retry),
            settings,
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    fn enter(&mut self, phase: RunPhase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "run phase");
        self.phase = phase;
    }

    /// Visits every item exactly once and returns the aggregated result.
    ///
    /// Fails without fetching or pausing when `items` is empty or no item has
    /// an identifier.
    pub fn run(&mut self, items: &[WorkItem], env: RunEnv<'_>) -> Result<RunResult, RunError> {
        let RunEnv {
            sleeper,
            rng,
            observer,
        } = env;

        if items.is_empty() {
            return Err(RunError::EmptyWorkSource);
        }
        if items.iter().all(|i| i.id().is_none()) {
            return Err(RunError::NoValidItems(items.len()));
        }

        let batches = partition(items, self.settings.batch_size);
        let total = batches.len();
        tracing::info!(items = items.len(), batches = total, "starting run");
        observer.on_event(&RunEvent::RunStarted {
            items: items.len(),
            batches: total,
        });

        let mut result = RunResult::new();
        for (i, batch) in batches.iter().enumerate() {
            let index = i + 1;
            self.enter(RunPhase::FetchingBatch(index));
            tracing::info!(batch = index, total, size = batch.len(), "starting batch");
            observer.on_event(&RunEvent::BatchStarted {
                index,
                total,
                size: batch.len(),
            });

            for item in batch.iter() {
                observer.on_event(&RunEvent::ItemStarted { item });
                let outcome = {
                    let mut sink = ObserverProgress {
                        observer: &mut *observer,
                        item,
                    };
                    self.fetcher.fetch(item, &mut sink, &mut *sleeper)
                };
                match &outcome {
                    RetryOutcome::Success { attempts } => {
                        tracing::info!(item_id = item.id().unwrap_or_default(), attempts, "item done");
                    }
                    RetryOutcome::Failed {
                        attempts,
                        last_error,
                    } => {
                        tracing::warn!(item_id = item.id().unwrap_or_default(), attempts, error = %last_error, "item failed");
                    }
                }
                result.record(item, &outcome);
                observer.on_event(&RunEvent::ItemFinished {
                    item,
                    outcome: &outcome,
                });

                // Items skipped for lacking an id cost no pause.
                if item.id().is_none() {
                    continue;
                }
                self.enter(RunPhase::PausingBetweenItems);
                let pause = self.settings.item_delay.sample(&mut *rng);
                observer.on_event(&RunEvent::Pausing {
                    kind: PauseKind::BetweenItems,
                    duration: pause,
                });
                sleeper.sleep(pause);
                self.enter(RunPhase::FetchingBatch(index));
            }

            if index < total {
                self.enter(RunPhase::PausingBetweenBatches);
                let pause = self.settings.batch_delay.sample(&mut *rng);
                tracing::info!(pause_secs = pause.as_secs_f64(), "pausing before next batch");
                observer.on_event(&RunEvent::Pausing {
                    kind: PauseKind::BetweenBatches,
                    duration: pause,
                });
                sleeper.sleep(pause);
            }
        }

        self.enter(RunPhase::Done);
        tracing::info!(
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            "run finished"
        );
        observer.on_event(&RunEvent::RunFinished {
            succeeded: result.succeeded.len(),
            failed: result.failed.len(),
        });
        Ok(result)
    }
}
