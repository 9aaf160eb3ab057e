use crate::models::lockout::{AttemptOutcome, AttemptRecord, LockoutStatus, MAX_ATTEMPTS};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Tracks failed login attempts per identifier and imposes a temporary
/// lockout once the failure threshold is crossed.
///
/// The guard is advisory: the login route must consult [`check_lockout`]
/// before verifying credentials and report the result back through
/// [`record_outcome`]. Expiry is lazy; records are interpreted against the
/// clock at read time and there is no background sweep.
///
/// [`check_lockout`]: LoginGuard::check_lockout
/// [`record_outcome`]: LoginGuard::record_outcome
#[derive(Debug, Default)]
pub struct LoginGuard {
    records: Mutex<HashMap<String, AttemptRecord>>,
}

/// Trims and lower-cases the login identifier so `" A@X.com"` and
/// `"a@x.com"` share one record.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl LoginGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record for the identifier. Absent and window-expired records
    /// both read as the zero state. Pure read, no side effects.
    pub async fn status(&self, identifier: &str) -> AttemptRecord {
        self.status_at(identifier, Utc::now()).await
    }

    /// Whether the identifier is currently locked out, and for how much
    /// longer. Callers must block the login attempt while `locked` is true.
    pub async fn check_lockout(&self, identifier: &str) -> LockoutStatus {
        self.check_lockout_at(identifier, Utc::now()).await
    }

    /// Record the outcome of a login attempt. Success clears the record
    /// entirely; failure counts toward the lockout threshold. While a
    /// lockout is active the call changes nothing and reports the
    /// still-locked state.
    pub async fn record_outcome(&self, identifier: &str, success: bool) -> AttemptOutcome {
        self.record_outcome_at(identifier, success, Utc::now()).await
    }

    pub(crate) async fn status_at(&self, identifier: &str, now: DateTime<Utc>) -> AttemptRecord {
        let key = normalize_identifier(identifier);
        let records = self.records.lock().await;
        load(&records, &key, now)
    }

    pub(crate) async fn check_lockout_at(&self, identifier: &str, now: DateTime<Utc>) -> LockoutStatus {
        self.status_at(identifier, now).await.lockout_status(now)
    }

    pub(crate) async fn record_outcome_at(&self, identifier: &str, success: bool, now: DateTime<Utc>) -> AttemptOutcome {
        let key = normalize_identifier(identifier);
        let mut records = self.records.lock().await;
        let mut record = load(&records, &key, now);

        // An active lockout is neither extended nor shortened by further
        // attempts.
        if record.active_lockout(now).is_some() {
            return AttemptOutcome {
                locked: true,
                attempts_remaining: 0,
            };
        }

        if success {
            records.remove(&key);
            return AttemptOutcome {
                locked: false,
                attempts_remaining: MAX_ATTEMPTS,
            };
        }

        let outcome = record.register_failure(now);
        records.insert(key, record);
        outcome
    }
}

fn load(records: &HashMap<String, AttemptRecord>, key: &str, now: DateTime<Utc>) -> AttemptRecord {
    records
        .get(key)
        .filter(|record| !record.window_expired(now))
        .cloned()
        .unwrap_or_default()
}
