use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Consecutive failures allowed before a lockout is imposed.
pub const MAX_ATTEMPTS: i32 = 5;
/// How long an identifier stays locked once the threshold is crossed.
pub const LOCKOUT_MINUTES: i64 = 15;
/// Sliding window after which a stale failure count is discarded.
pub const ATTEMPT_WINDOW_MINUTES: i64 = 30;

/// Per-identifier attempt state. The zero value (`Default`) is the fresh
/// record returned for identifiers with no recorded failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptRecord {
    pub attempts: i32,
    pub lockout_until: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LockoutStatus {
    pub locked: bool,
    pub remaining_seconds: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AttemptOutcome {
    pub locked: bool,
    pub attempts_remaining: i32,
}

impl AttemptRecord {
    /// True once the attempt window has passed without any recorded
    /// activity. Expired records read as the zero state.
    pub fn window_expired(&self, now: DateTime<Utc>) -> bool {
        match self.last_attempt {
            Some(at) => now - at > Duration::minutes(ATTEMPT_WINDOW_MINUTES),
            None => false,
        }
    }

    /// The lockout deadline while it is still in the future. A deadline at
    /// or before `now` has expired naturally and reads as absent.
    pub fn active_lockout(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.lockout_until.filter(|until| *until > now)
    }

    pub fn lockout_status(&self, now: DateTime<Utc>) -> LockoutStatus {
        match self.active_lockout(now) {
            Some(until) => LockoutStatus {
                locked: true,
                remaining_seconds: remaining_seconds(until, now),
            },
            None => LockoutStatus {
                locked: false,
                remaining_seconds: 0,
            },
        }
    }

    /// Register one failed attempt. Crossing the threshold sets the lockout
    /// deadline; the deadline only ever moves forward.
    pub fn register_failure(&mut self, now: DateTime<Utc>) -> AttemptOutcome {
        self.attempts += 1;
        self.last_attempt = Some(now);

        if self.attempts >= MAX_ATTEMPTS {
            let until = now + Duration::minutes(LOCKOUT_MINUTES);
            if self.lockout_until.is_none_or(|current| until > current) {
                self.lockout_until = Some(until);
            }
            AttemptOutcome {
                locked: true,
                attempts_remaining: 0,
            }
        } else {
            AttemptOutcome {
                locked: false,
                attempts_remaining: MAX_ATTEMPTS - self.attempts,
            }
        }
    }
}

/// Seconds until `until`, rounded up so an active lockout never reports
/// zero remaining seconds.
fn remaining_seconds(until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (until - now).num_milliseconds();
    (millis + 999).div_euclid(1000).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, second).unwrap()
    }

    #[test]
    fn fresh_record_is_unlocked() {
        let record = AttemptRecord::default();
        let status = record.lockout_status(at(0, 0));
        assert!(!status.locked);
        assert_eq!(status.remaining_seconds, 0);
    }

    #[test]
    fn four_failures_leave_one_attempt() {
        let mut record = AttemptRecord::default();
        let now = at(0, 0);

        for expected_remaining in (1..=4).rev() {
            let outcome = record.register_failure(now);
            assert!(!outcome.locked);
            assert_eq!(outcome.attempts_remaining, expected_remaining);
        }

        assert_eq!(record.attempts, 4);
        assert!(record.lockout_until.is_none());
    }

    #[test]
    fn fifth_failure_locks_for_fifteen_minutes() {
        let mut record = AttemptRecord::default();
        let now = at(0, 0);

        for _ in 0..4 {
            record.register_failure(now);
        }
        let outcome = record.register_failure(now);

        assert!(outcome.locked);
        assert_eq!(outcome.attempts_remaining, 0);
        assert_eq!(record.lockout_until, Some(now + Duration::minutes(LOCKOUT_MINUTES)));
    }

    #[test]
    fn lockout_boundary_is_exact() {
        let mut record = AttemptRecord::default();
        let locked_at = at(0, 0);
        for _ in 0..5 {
            record.register_failure(locked_at);
        }
        let until = locked_at + Duration::minutes(LOCKOUT_MINUTES);

        let just_before = record.lockout_status(until - Duration::seconds(1));
        assert!(just_before.locked);
        assert_eq!(just_before.remaining_seconds, 1);

        assert!(!record.lockout_status(until).locked);
        assert!(!record.lockout_status(until + Duration::seconds(1)).locked);
    }

    #[test]
    fn lockout_expiry_does_not_reset_attempts() {
        // Deliberate policy: only success or window expiry clears the
        // counter, so one more failure after waiting out the lockout
        // re-locks immediately.
        let mut record = AttemptRecord::default();
        let locked_at = at(0, 0);
        for _ in 0..5 {
            record.register_failure(locked_at);
        }

        let after_lockout = locked_at + Duration::minutes(LOCKOUT_MINUTES + 1);
        assert!(!record.lockout_status(after_lockout).locked);
        assert_eq!(record.attempts, 5);

        let outcome = record.register_failure(after_lockout);
        assert!(outcome.locked);
        assert!(record.lockout_status(after_lockout).locked);
    }

    #[test]
    fn relocking_moves_the_deadline_forward() {
        let mut record = AttemptRecord::default();
        let locked_at = at(0, 0);
        for _ in 0..5 {
            record.register_failure(locked_at);
        }
        let first_deadline = record.lockout_until.unwrap();

        let retry = locked_at + Duration::minutes(LOCKOUT_MINUTES + 2);
        record.register_failure(retry);

        assert!(record.lockout_until.unwrap() > first_deadline);
    }

    #[test]
    fn window_expiry_is_reported() {
        let mut record = AttemptRecord::default();
        let now = at(0, 0);
        record.register_failure(now);

        assert!(!record.window_expired(now + Duration::minutes(ATTEMPT_WINDOW_MINUTES)));
        assert!(record.window_expired(now + Duration::minutes(ATTEMPT_WINDOW_MINUTES) + Duration::seconds(1)));
    }

    #[test]
    fn remaining_seconds_rounds_up() {
        let now = at(0, 0);
        assert_eq!(remaining_seconds(now + Duration::milliseconds(500), now), 1);
        assert_eq!(remaining_seconds(now + Duration::seconds(90), now), 90);
        assert_eq!(remaining_seconds(now - Duration::seconds(5), now), 0);
    }

    proptest! {
        #[test]
        fn fewer_than_threshold_failures_never_lock(n in 0i32..MAX_ATTEMPTS) {
            let mut record = AttemptRecord::default();
            let now = at(0, 0);
            for _ in 0..n {
                record.register_failure(now);
            }
            prop_assert!(record.active_lockout(now).is_none());
            prop_assert_eq!(record.attempts, n);
        }

        #[test]
        fn lockout_deadline_never_decreases(gaps in prop::collection::vec(0i64..60, 5..20)) {
            let mut record = AttemptRecord::default();
            let mut now = at(0, 0);
            let mut last_deadline: Option<DateTime<Utc>> = None;

            for gap in gaps {
                now += Duration::minutes(gap);
                record.register_failure(now);
                if let (Some(previous), Some(current)) = (last_deadline, record.lockout_until) {
                    prop_assert!(current >= previous);
                }
                last_deadline = record.lockout_until.or(last_deadline);
            }
        }
    }
}
