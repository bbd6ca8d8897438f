//! Failed-login tracking and account lockout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Consecutive failures that lock an account
pub const MAX_FAILED_ATTEMPTS: i32 = 5;
/// Once an account has been locked this many times an admin can no longer unlock it
pub const MAX_BLOCK_COUNT: i32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginAttemptTracker {
    pub id: Uuid,
    pub username: String,
    pub failed_count: i32,
    pub is_blocked: bool,
    pub block_count: i32,
    pub last_failed_at: Option<DateTime<Utc>>,
    pub blocked_at: Option<DateTime<Utc>>,
}

impl LoginAttemptTracker {
    pub fn new(username: &str) -> Result<Self, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::validation("Username cannot be empty."));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            failed_count: 0,
            is_blocked: false,
            block_count: 0,
            last_failed_at: None,
            blocked_at: None,
        })
    }

    /// Returns true when this failure locked the account
    pub fn record_failed_attempt(&mut self, now: DateTime<Utc>) -> bool {
        self.failed_count += 1;
        self.last_failed_at = Some(now);

        if self.failed_count >= MAX_FAILED_ATTEMPTS && !self.is_blocked {
            self.is_blocked = true;
            self.block_count += 1;
            self.blocked_at = Some(now);
            return true;
        }
        false
    }

    pub fn reset_failed_attempts(&mut self) {
        self.failed_count = 0;
        self.last_failed_at = None;
    }

    pub fn can_be_unblocked(&self) -> bool {
        self.is_blocked && self.block_count < MAX_BLOCK_COUNT
    }

    pub fn unblock(&mut self) -> Result<(), DomainError> {
        if !self.can_be_unblocked() {
            return Err(DomainError::invalid_operation(
                "User cannot be unblocked. Maximum block count reached.",
            ));
        }
        self.is_blocked = false;
        self.failed_count = 0;
        self.blocked_at = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail(tracker: &mut LoginAttemptTracker, times: i32) -> bool {
        let mut locked = false;
        for _ in 0..times {
            locked = tracker.record_failed_attempt(Utc::now());
        }
        locked
    }

    #[test]
    fn test_fifth_failure_blocks() {
        let mut tracker = LoginAttemptTracker::new("john_doe").unwrap();
        assert!(!fail(&mut tracker, 4));
        assert!(!tracker.is_blocked);

        assert!(fail(&mut tracker, 1));
        assert!(tracker.is_blocked);
        assert_eq!(tracker.block_count, 1);
        assert!(tracker.blocked_at.is_some());
    }

    #[test]
    fn test_reset_clears_failures_only() {
        let mut tracker = LoginAttemptTracker::new("john_doe").unwrap();
        fail(&mut tracker, 3);
        tracker.reset_failed_attempts();
        assert_eq!(tracker.failed_count, 0);
        assert!(tracker.last_failed_at.is_none());
        assert!(!fail(&mut tracker, 4), "count restarts after reset");
    }

    #[test]
    fn test_unblock_allowed_until_third_block() {
        let mut tracker = LoginAttemptTracker::new("jane").unwrap();

        for round in 1..=2 {
            fail(&mut tracker, 5);
            assert_eq!(tracker.block_count, round);
            assert!(tracker.can_be_unblocked());
            tracker.unblock().unwrap();
            assert!(!tracker.is_blocked);
            assert_eq!(tracker.failed_count, 0);
        }

        fail(&mut tracker, 5);
        assert_eq!(tracker.block_count, 3);
        assert!(!tracker.can_be_unblocked());
        assert_eq!(
            tracker.unblock().unwrap_err(),
            DomainError::invalid_operation("User cannot be unblocked. Maximum block count reached.")
        );
        assert!(tracker.is_blocked);
    }

    #[test]
    fn test_unblock_requires_block() {
        let mut tracker = LoginAttemptTracker::new("bob").unwrap();
        assert!(!tracker.can_be_unblocked());
        assert!(tracker.unblock().is_err());
    }

    #[test]
    fn test_blank_username_is_rejected() {
        assert!(LoginAttemptTracker::new("  ").is_err());
    }
}
