use chrono::{DateTime, Utc};

use crate::types::db::user;

/// Pure state transitions for the brute-force lockout policy
///
/// Centralizing the counter/timestamp logic here keeps it independently
/// testable; the authenticator decides when to evaluate each transition and
/// persists the result inside its own transaction.
pub struct LockoutPolicy {
    threshold: u32,
    lockout_duration_secs: i64,
}

/// Result of a failed-attempt transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    pub failed_login_attempts: i32,
    /// Set when the failure reached the threshold
    pub locked_until: Option<i64>,
}

impl LockoutPolicy {
    pub fn new(threshold: u32, lockout_duration_secs: i64) -> Self {
        Self {
            threshold,
            lockout_duration_secs,
        }
    }

    /// True iff the account is currently locked
    pub fn is_locked(&self, user: &user::Model, now: DateTime<Utc>) -> bool {
        matches!(user.locked_until, Some(until) if now.timestamp() < until)
    }

    /// True iff a lock was set and has since passed
    ///
    /// The caller clears the lock and resets the counter (lazy auto-unlock),
    /// persisting the mutation in the same transaction as the surrounding
    /// operation.
    pub fn lock_expired(&self, user: &user::Model, now: DateTime<Utc>) -> bool {
        matches!(user.locked_until, Some(until) if now.timestamp() >= until)
    }

    /// Transition after a failed password check
    pub fn after_failure(&self, current_attempts: i32, now: DateTime<Utc>) -> FailureOutcome {
        let failed_login_attempts = current_attempts.saturating_add(1);
        let locked_until = (failed_login_attempts >= self.threshold as i32)
            .then(|| now.timestamp() + self.lockout_duration_secs);

        FailureOutcome {
            failed_login_attempts,
            locked_until,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
