//! Batch orchestration.
//!
//! Drives partition → fetch → retry across a whole playlist, sequentially,
//! with randomized pauses between items and between batches. Per-item
//! failures are folded into [`RunResult`]; only run-level problems (nothing
//! to download) come back as errors.

mod events;
mod result;
mod run;

pub use events::{NullObserver, PauseKind, RunEvent, RunObserver};
pub use result::{FailedItem, RunResult};
pub use run::{BatchOrchestrator, RunEnv, RunPhase, RunSettings};
