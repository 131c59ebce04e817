//! Replay-window enforcement for the declared signing time.
//!
//! The gateway stamps each request with its signing time as decimal
//! milliseconds since the Unix epoch. A request older than the grace
//! period is rejected. There is deliberately no lower bound: a
//! future-dated timestamp passes (a known gap in the protocol, kept
//! as-is so signer and verifier stay in agreement).

use crate::clock::Clock;
use std::time::Duration;

/// Parse a signing-time header value (decimal epoch milliseconds).
pub fn parse_time_header(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Check that a declared signing time is within the grace period.
///
/// Accepts `delta == grace` exactly; rejects from the first millisecond
/// past it.
pub fn is_fresh<C: Clock + ?Sized>(declared_ms: i64, grace: Duration, clock: &C) -> bool {
    let delta = clock.now_unix_millis() - declared_ms;
    delta <= grace.as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    const GRACE: Duration = Duration::from_millis(300_000);

    #[test]
    fn parse_valid_millis() {
        assert_eq!(parse_time_header("1700000000000"), Some(1_700_000_000_000));
        assert_eq!(parse_time_header(" 42 "), Some(42));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_time_header("not-a-number"), None);
        assert_eq!(parse_time_header(""), None);
        assert_eq!(parse_time_header("12.5"), None);
    }

    #[test]
    fn fresh_within_window() {
        let clock = MockClock::at_unix_millis(1_700_000_001_000);
        assert!(is_fresh(1_700_000_000_000, GRACE, &clock));
    }

    #[test]
    fn boundary_delta_equal_to_grace_accepted() {
        let clock = MockClock::at_unix_millis(1_700_000_300_000);
        assert!(is_fresh(1_700_000_000_000, GRACE, &clock));
    }

    #[test]
    fn boundary_delta_one_past_grace_rejected() {
        let clock = MockClock::at_unix_millis(1_700_000_300_001);
        assert!(!is_fresh(1_700_000_000_000, GRACE, &clock));
    }

    #[test]
    fn stale_request_rejected() {
        let clock = MockClock::at_unix_millis(1_700_000_400_000);
        assert!(!is_fresh(1_700_000_000_000, GRACE, &clock));
    }

    #[test]
    fn future_dated_timestamp_accepted() {
        // No lower bound on the delta; see module docs.
        let clock = MockClock::at_unix_millis(1_700_000_000_000);
        assert!(is_fresh(1_700_000_600_000, GRACE, &clock));
    }
}
