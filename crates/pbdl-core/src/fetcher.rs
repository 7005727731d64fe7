//! Fetch one work item: best-effort metadata, then a retried download.

use crate::delay::Sleeper;
use crate::item::{ItemMetadata, WorkItem};
use crate::progress::{fraction, MonotonicProgress, ProgressSink, TransferEvent};
use crate::provider::MediaProvider;
use crate::retry::{self, RetryOutcome, RetryPolicy};

/// Reason recorded for items that have no identifier.
pub const NO_ID: &str = "no-id";

/// Downloads single items through a provider under a retry policy.
pub struct ItemFetcher<'p> {
    provider: &'p dyn MediaProvider,
    policy: RetryPolicy,
}

impl<'p> ItemFetcher<'p> {
    pub fn new(provider: &'p dyn MediaProvider, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Metadata for display and progress; falls back to the item's own fields.
    pub fn resolve_metadata(&self, item: &WorkItem) -> ItemMetadata {
        match self.provider.resolve(item) {
            Ok(meta) => ItemMetadata {
                title: meta
                    .title
                    .or_else(|| Some(item.display_title().to_string())),
                size_estimate: meta.size_estimate,
            },
            Err(e) => {
                tracing::debug!(item_id = item.id().unwrap_or_default(), error = %e, "metadata lookup failed; using playlist title");
                ItemMetadata {
                    title: Some(item.display_title().to_string()),
                    size_estimate: None,
                }
            }
        }
    }

    /// Fetch `item`, reporting progress to `sink` and sleeping backoff through `sleeper`.
    ///
    /// Items without an identifier fail immediately with [`NO_ID`]: zero
    /// attempts, no provider calls, no backoff.
    pub fn fetch(
        &self,
        item: &WorkItem,
        sink: &mut dyn ProgressSink,
        sleeper: &mut dyn Sleeper,
    ) -> RetryOutcome {
        let Some(id) = item.id() else {
            return RetryOutcome::Failed {
                attempts: 0,
                last_error: NO_ID.to_string(),
            };
        };

        let meta = self.resolve_metadata(item);
        let size = meta.size_estimate;
        let mut progress = MonotonicProgress::new(sink);

        let outcome = retry::attempt(&self.policy, sleeper, |attempt| {
            tracing::debug!(item_id = id, attempt, "download attempt");
            let mut on_event = |event: TransferEvent| match event {
                TransferEvent::Downloading { downloaded_bytes } => {
                    if let Some(f) = fraction(downloaded_bytes, size) {
                        progress.report(f);
                    }
                }
                // The transfer is done but post-processing may still fail;
                // completion is reported only once the attempt succeeds.
                TransferEvent::Finished => {}
            };
            self.provider.perform(item, &mut on_event)
        });

        if outcome.is_success() {
            progress.report(1.0);
        }
        tracing::debug!(item_id = id, ?outcome, "fetch finished");
        outcome
    }
}
