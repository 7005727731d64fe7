//! Blocking pauses and randomized delay ranges.
//!
//! All waiting in the pipeline goes through [`Sleeper`] so tests can record
//! the requested durations instead of sleeping.

use rand::Rng;
use rand::RngCore;
use std::time::Duration;

use crate::error::ConfigError;

/// Something that blocks the current thread for a duration.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Real sleeper backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Records requested durations without sleeping.
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    pub sleeps: Vec<Duration>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Duration {
        self.sleeps.iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}

/// Closed interval of seconds a pause is drawn from, uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    min_secs: f64,
    max_secs: f64,
}

impl DelayRange {
    /// Builds a range; `name` only labels the error.
    pub fn new(name: &'static str, min_secs: f64, max_secs: f64) -> Result<Self, ConfigError> {
        let valid = min_secs.is_finite()
            && min_secs >= 0.0
            && min_secs <= max_secs
            && Duration::try_from_secs_f64(max_secs).is_ok();
        if !valid {
            return Err(ConfigError::InvalidDelayRange {
                name,
                min: min_secs,
                max: max_secs,
            });
        }
        Ok(Self { min_secs, max_secs })
    }

    /// A range that always yields zero.
    pub fn zero() -> Self {
        Self {
            min_secs: 0.0,
            max_secs: 0.0,
        }
    }

    pub fn min_secs(&self) -> f64 {
        self.min_secs
    }

    pub fn max_secs(&self) -> f64 {
        self.max_secs
    }

    /// Every draw is within `[min, max]`, and `max` fits a `Duration` (checked in `new`).
    pub fn sample(&self, rng: &mut dyn RngCore) -> Duration {
        if self.min_secs == self.max_secs {
            return Duration::from_secs_f64(self.min_secs);
        }
        Duration::from_secs_f64(rng.gen_range(self.min_secs..=self.max_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sample_stays_in_range() {
        let range = DelayRange::new("item", 2.0, 5.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let d = range.sample(&mut rng).as_secs_f64();
            assert!((2.0..=5.0).contains(&d), "{d} out of range");
        }
    }

    #[test]
    fn degenerate_range_is_constant() {
        let range = DelayRange::new("batch", 3.0, 3.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(range.sample(&mut rng), Duration::from_secs(3));
        assert_eq!(DelayRange::zero().sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn rejects_inverted_and_negative() {
        assert!(matches!(
            DelayRange::new("item", 5.0, 2.0),
            Err(ConfigError::InvalidDelayRange { name: "item", .. })
        ));
        assert!(DelayRange::new("batch", -1.0, 2.0).is_err());
        assert!(DelayRange::new("batch", 0.0, f64::NAN).is_err());
    }

    #[test]
    fn rejects_max_beyond_duration_range() {
        assert!(matches!(
            DelayRange::new("item", 0.0, 1e20),
            Err(ConfigError::InvalidDelayRange { name: "item", .. })
        ));
        let wide = DelayRange::new("item", 0.0, 1e9).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(wide.sample(&mut rng) <= Duration::from_secs(1_000_000_000));
    }

    #[test]
    fn recording_sleeper_sums() {
        let mut s = RecordingSleeper::new();
        s.sleep(Duration::from_secs(1));
        s.sleep(Duration::from_millis(500));
        assert_eq!(s.sleeps.len(), 2);
        assert_eq!(s.total(), Duration::from_millis(1500));
    }
}
