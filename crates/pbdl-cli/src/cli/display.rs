//! Console rendering of run events.

use pbdl_core::naming::display_truncate;
use pbdl_core::orchestrator::{PauseKind, RunEvent, RunObserver};
use pbdl_core::retry::RetryOutcome;
use std::io::Write;
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);
const TITLE_WIDTH: usize = 60;

/// Prints batch headers, a throttled per-item progress line and item results.
pub struct ConsoleObserver {
    last_print: Option<Instant>,
    progress_open: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self {
            last_print: None,
            progress_open: false,
        }
    }

    fn end_progress_line(&mut self) {
        if self.progress_open {
            println!();
            self.progress_open = false;
        }
    }

    fn should_print(&self, fraction: f64, now: Instant) -> bool {
        fraction >= 1.0
            || self
                .last_print
                .map_or(true, |last| now.duration_since(last) >= PROGRESS_INTERVAL)
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ConsoleObserver {
    fn on_event(&mut self, event: &RunEvent<'_>) {
        match event {
            RunEvent::RunStarted { items, batches } => {
                println!("Downloading {items} item(s) in {batches} batch(es)");
            }
            RunEvent::BatchStarted { index, total, size } => {
                self.end_progress_line();
                println!();
                println!("Starting batch {index}/{total} ({size} item(s))");
            }
            RunEvent::ItemStarted { .. } => {
                self.last_print = None;
            }
            RunEvent::ItemProgress { item, fraction } => {
                let now = Instant::now();
                if !self.should_print(*fraction, now) {
                    return;
                }
                let title = display_truncate(item.display_title(), TITLE_WIDTH);
                print!("\r  {:5.1}%  {title}", fraction * 100.0);
                let _ = std::io::stdout().flush();
                self.last_print = Some(now);
                self.progress_open = true;
            }
            RunEvent::ItemFinished { item, outcome } => {
                self.end_progress_line();
                let title = display_truncate(item.display_title(), TITLE_WIDTH);
                match outcome {
                    RetryOutcome::Success { .. } => println!("✔ {title}"),
                    RetryOutcome::Failed { last_error, .. } => {
                        println!("✖ {title} → {last_error}")
                    }
                }
            }
            RunEvent::Pausing {
                kind: PauseKind::BetweenBatches,
                duration,
            } => {
                println!("Pausing {:.1}s before next batch...", duration.as_secs_f64());
            }
            RunEvent::Pausing {
                kind: PauseKind::BetweenItems,
                duration,
            } => {
                tracing::debug!(secs = duration.as_secs_f64(), "pausing between items");
            }
            RunEvent::RunFinished { .. } => self.end_progress_line(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_progress_update_always_prints() {
        let obs = ConsoleObserver::new();
        assert!(obs.should_print(0.1, Instant::now()));
    }

    #[test]
    fn progress_is_throttled_until_complete() {
        let mut obs = ConsoleObserver::new();
        let now = Instant::now();
        obs.last_print = Some(now);
        assert!(!obs.should_print(0.4, now));
        assert!(obs.should_print(1.0, now));
        assert!(obs.should_print(0.5, now + PROGRESS_INTERVAL));
    }
}
