//! Deterministic clock abstraction for testable time-dependent logic.

use chrono::{DateTime, Utc};

/// Clock trait for deterministic time in tests.
pub trait Clock: Send + Sync {
    /// Get the current UTC time.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current time as milliseconds since the Unix epoch.
    ///
    /// The gateway's signing-time header is expressed in this unit.
    fn now_unix_millis(&self) -> i64 {
        self.now_utc().timestamp_millis()
    }
}

/// System clock using actual wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock clock for deterministic testing.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone)]
pub struct MockClock {
    now: DateTime<Utc>,
}

#[cfg(any(test, feature = "test-seams"))]
impl MockClock {
    /// Create a mock clock frozen at the given time.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Create a mock clock frozen at the given epoch-millisecond instant.
    pub fn at_unix_millis(millis: i64) -> Self {
        Self {
            now: DateTime::from_timestamp_millis(millis).expect("valid epoch millis"),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&mut self, duration: chrono::Duration) {
        self.now = self.now + duration;
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn system_clock_returns_time() {
        let clock = SystemClock;
        let now = clock.now_utc();
        assert!(now.year() >= 2024);
    }

    #[test]
    fn mock_clock_is_deterministic() {
        let clock = MockClock::at_unix_millis(1_700_000_000_000);
        assert_eq!(clock.now_unix_millis(), 1_700_000_000_000);
        assert_eq!(clock.now_unix_millis(), 1_700_000_000_000);
    }

    #[test]
    fn mock_clock_advances() {
        let mut clock = MockClock::at_unix_millis(1_700_000_000_000);
        clock.advance(chrono::Duration::milliseconds(1500));
        assert_eq!(clock.now_unix_millis(), 1_700_000_001_500);
    }

    #[test]
    fn millis_accessor_matches_utc_time() {
        let clock = MockClock::at_unix_millis(42_000);
        assert_eq!(clock.now_utc().timestamp_millis(), 42_000);
    }
}
