//! Login attempt repository trait (port)

use async_trait::async_trait;

use crate::domain::LoginAttemptTracker;
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait LoginAttemptRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<LoginAttemptTracker>, DomainError>;

    /// Insert or update by username
    async fn save(&self, tracker: &LoginAttemptTracker) -> Result<(), DomainError>;

    /// Most recently blocked first
    async fn find_blocked(&self) -> Result<Vec<LoginAttemptTracker>, DomainError>;
}
