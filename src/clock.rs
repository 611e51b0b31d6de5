//! Injected time and randomness.
//!
//! Production wiring uses `SystemClock` + `RandomJitter`; tests swap in `ManualClock`
//! and `FixedJitter` so cache expiry and verdict thresholds are deterministic.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut g = self.now.lock().expect("clock mutex poisoned");
        *g += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

/// Source of the bounded perturbation added to the composite score.
pub trait JitterSource: Send + Sync {
    /// Returns a value in `[-amplitude, +amplitude]`.
    fn sample(&self, amplitude: f64) -> f64;
}

/// Uniform jitter from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn sample(&self, amplitude: f64) -> f64 {
        let a = amplitude.abs();
        if a == 0.0 {
            return 0.0;
        }
        rand::rng().random_range(-a..=a)
    }
}

/// Always returns the same offset (clamped into the amplitude band).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub f64);

impl FixedJitter {
    pub fn zero() -> Self {
        Self(0.0)
    }
}

impl JitterSource for FixedJitter {
    fn sample(&self, amplitude: f64) -> f64 {
        let a = amplitude.abs();
        self.0.clamp(-a, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_jitter_stays_in_band() {
        let j = RandomJitter;
        for _ in 0..1_000 {
            let v = j.sample(5.0);
            assert!((-5.0..=5.0).contains(&v), "out of band: {v}");
        }
        assert_eq!(j.sample(0.0), 0.0);
    }

    #[test]
    fn fixed_jitter_is_clamped_to_amplitude() {
        assert_eq!(FixedJitter(3.0).sample(5.0), 3.0);
        assert_eq!(FixedJitter(9.0).sample(5.0), 5.0);
        assert_eq!(FixedJitter(-9.0).sample(5.0), -5.0);
        assert_eq!(FixedJitter::zero().sample(5.0), 0.0);
    }

    #[test]
    fn manual_clock_advances() {
        let start = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let c = ManualClock::new(start);
        c.advance(Duration::minutes(31));
        assert_eq!(c.now() - start, Duration::minutes(31));
    }
}
