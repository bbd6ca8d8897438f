// ============================================================================
// Tour Core - Admin Service
// File: crates/tour-core/src/services/admin_service.rs
// ============================================================================
//! Blocked account management

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::domain::MAX_BLOCK_COUNT;
use crate::error::DomainError;
use crate::repositories::{LoginAttemptRepository, UserRepository};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedUser {
    pub username: String,
    /// `Tourist`, `Guide`, `Admin`, or `Unknown` when no account matches
    pub role: String,
    pub block_count: i32,
    pub blocked_at: Option<DateTime<Utc>>,
}

pub struct AdminService {
    users: Arc<dyn UserRepository>,
    attempts: Arc<dyn LoginAttemptRepository>,
}

impl AdminService {
    pub fn new(users: Arc<dyn UserRepository>, attempts: Arc<dyn LoginAttemptRepository>) -> Self {
        Self { users, attempts }
    }

    pub async fn blocked_users(&self) -> Result<Vec<BlockedUser>, DomainError> {
        let trackers = self.attempts.find_blocked().await?;

        let mut blocked = Vec::with_capacity(trackers.len());
        for tracker in trackers {
            let role = self.role_of(&tracker.username).await?;
            blocked.push(BlockedUser {
                username: tracker.username,
                role,
                block_count: tracker.block_count,
                blocked_at: tracker.blocked_at,
            });
        }
        Ok(blocked)
    }

    /// Returns the confirmation message shown to the admin
    pub async fn unblock_user(&self, username: &str) -> Result<String, DomainError> {
        let mut tracker = self
            .attempts
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;

        if !tracker.is_blocked {
            return Err(DomainError::NotBlocked(username.to_string()));
        }

        if !tracker.can_be_unblocked() {
            return Err(DomainError::CannotUnblock {
                username: username.to_string(),
                block_count: tracker.block_count,
                max: MAX_BLOCK_COUNT,
            });
        }

        tracker.unblock()?;
        self.attempts.save(&tracker).await?;
        info!("User unblocked: {} (block count {})", username, tracker.block_count);

        Ok(format!("User '{}' has been unblocked successfully.", username))
    }

    async fn role_of(&self, username: &str) -> Result<String, DomainError> {
        if self.users.find_tourist_by_username(username).await?.is_some() {
            return Ok(tour_shared::Role::Tourist.to_string());
        }
        Ok(self
            .users
            .find_system_user_by_username(username)
            .await?
            .map(|u| u.role.to_string())
            .unwrap_or_else(|| "Unknown".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoginAttemptTracker, MAX_FAILED_ATTEMPTS};
    use crate::repositories::{MockLoginAttemptRepository, MockUserRepository};
    use crate::services::cart_service::tests::tourist_with_points;

    fn blocked_tracker(username: &str, times: i32) -> LoginAttemptTracker {
        let mut tracker = LoginAttemptTracker::new(username).unwrap();
        for round in 0..times {
            if round > 0 {
                tracker.unblock().unwrap();
            }
            for _ in 0..MAX_FAILED_ATTEMPTS {
                tracker.record_failed_attempt(Utc::now());
            }
        }
        tracker
    }

    #[tokio::test]
    async fn test_blocked_users_resolve_roles() {
        let mut attempts = MockLoginAttemptRepository::new();
        attempts
            .expect_find_blocked()
            .returning(|| Ok(vec![blocked_tracker("jane_smith", 1), blocked_tracker("ghost", 2)]));

        let mut users = MockUserRepository::new();
        users.expect_find_tourist_by_username().returning(|name| {
            Ok((name == "jane_smith").then(|| tourist_with_points(0)))
        });
        users.expect_find_system_user_by_username().returning(|_| Ok(None));

        let service = AdminService::new(Arc::new(users), Arc::new(attempts));
        let blocked = service.blocked_users().await.unwrap();

        assert_eq!(blocked.len(), 2);
        assert_eq!(blocked[0].role, "Tourist");
        assert_eq!(blocked[1].role, "Unknown");
        assert_eq!(blocked[1].block_count, 2);
        assert!(blocked[0].blocked_at.is_some());
    }

    #[tokio::test]
    async fn test_unblock_user() {
        let mut attempts = MockLoginAttemptRepository::new();
        attempts
            .expect_find_by_username()
            .returning(|name| Ok(Some(blocked_tracker(name, 1))));
        attempts
            .expect_save()
            .withf(|t| !t.is_blocked && t.failed_count == 0 && t.block_count == 1)
            .times(1)
            .returning(|_| Ok(()));

        let service = AdminService::new(Arc::new(MockUserRepository::new()), Arc::new(attempts));
        let message = service.unblock_user("john_doe").await.unwrap();
        assert_eq!(message, "User 'john_doe' has been unblocked successfully.");
    }

    #[tokio::test]
    async fn test_unblock_refused_after_third_block() {
        let mut attempts = MockLoginAttemptRepository::new();
        attempts
            .expect_find_by_username()
            .returning(|name| Ok(Some(blocked_tracker(name, 3))));
        attempts.expect_save().times(0);

        let service = AdminService::new(Arc::new(MockUserRepository::new()), Arc::new(attempts));
        let err = service.unblock_user("john_doe").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "User 'john_doe' cannot be unblocked. User has been blocked 3 times (maximum is 3)."
        );
    }

    #[tokio::test]
    async fn test_unblock_unknown_and_active_users() {
        let mut attempts = MockLoginAttemptRepository::new();
        attempts.expect_find_by_username().returning(|name| {
            if name == "active" {
                Ok(Some(LoginAttemptTracker::new(name).unwrap()))
            } else {
                Ok(None)
            }
        });

        let service = AdminService::new(Arc::new(MockUserRepository::new()), Arc::new(attempts));
        assert_eq!(service.unblock_user("nobody").await.unwrap_err().code(), "USER_NOT_FOUND");
        assert_eq!(service.unblock_user("active").await.unwrap_err().code(), "NOT_BLOCKED");
    }
}
