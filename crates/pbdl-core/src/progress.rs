//! Per-item progress reporting.
//!
//! Providers report raw transfer events (bytes so far, finished); the fetcher
//! turns those into fractions in `[0.0, 1.0]` for a [`ProgressSink`].

/// Raw event from a provider while a download is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEvent {
    /// Bytes downloaded so far for the current attempt.
    Downloading { downloaded_bytes: u64 },
    /// The tool reported the transfer finished (post-processing may follow).
    Finished,
}

/// Receives fractional progress for one item.
pub trait ProgressSink {
    fn report(&mut self, fraction: f64);
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn report(&mut self, fraction: f64) {
        self(fraction)
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _fraction: f64) {}
}

/// Fraction complete in [0.0, 1.0]; `None` when the total is unknown.
pub fn fraction(downloaded_bytes: u64, total_bytes: Option<u64>) -> Option<f64> {
    let total = total_bytes.filter(|t| *t > 0)?;
    Some((downloaded_bytes as f64 / total as f64).min(1.0))
}

/// Wraps a sink so it only ever sees clamped, non-decreasing values.
///
/// A retried download restarts its byte count; those lower values are dropped.
pub struct MonotonicProgress<'a> {
    inner: &'a mut dyn ProgressSink,
    last: Option<f64>,
}

impl<'a> MonotonicProgress<'a> {
    pub fn new(inner: &'a mut dyn ProgressSink) -> Self {
        Self { inner, last: None }
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

impl ProgressSink for MonotonicProgress<'_> {
    fn report(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let f = fraction.clamp(0.0, 1.0);
        if matches!(self.last, Some(prev) if f < prev) {
            return;
        }
        self.last = Some(f);
        self.inner.report(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_needs_known_size() {
        assert_eq!(fraction(50, Some(200)), Some(0.25));
        assert_eq!(fraction(300, Some(200)), Some(1.0));
        assert_eq!(fraction(10, None), None);
        assert_eq!(fraction(10, Some(0)), None);
    }

    #[test]
    fn monotonic_drops_regressions_and_clamps() {
        let mut seen = Vec::new();
        {
            let mut record = |f: f64| seen.push(f);
            let mut sink = MonotonicProgress::new(&mut record);
            sink.report(0.2);
            sink.report(0.5);
            sink.report(0.1);
            sink.report(1.7);
            sink.report(f64::NAN);
            sink.report(1.0);
            assert_eq!(sink.last(), Some(1.0));
        }
        assert_eq!(seen, vec![0.2, 0.5, 1.0, 1.0]);
    }
}
