//! Epoch clock used for expiry checks.

use chrono::Utc;

/// Source of the current time as UTC epoch seconds.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch, with sub-second precision.
    fn now(&self) -> f64;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_precision_loss)]
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800.0);
    }

    #[test]
    fn fixed_clock_returns_its_instant() {
        assert!((FixedClock(42.5).now() - 42.5).abs() < f64::EPSILON);
    }
}
