//! User repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{SystemUser, Tourist};
use crate::error::DomainError;

/// Username lookups are case-insensitive.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_tourist_by_id(&self, id: &Uuid) -> Result<Option<Tourist>, DomainError>;
    async fn find_tourist_by_username(&self, username: &str) -> Result<Option<Tourist>, DomainError>;
    async fn find_tourist_by_email(&self, email: &str) -> Result<Option<Tourist>, DomainError>;
    async fn find_tourists_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tourist>, DomainError>;
    async fn create_tourist(&self, tourist: &Tourist) -> Result<Tourist, DomainError>;

    async fn find_system_user_by_id(&self, id: &Uuid) -> Result<Option<SystemUser>, DomainError>;
    async fn find_system_user_by_username(&self, username: &str) -> Result<Option<SystemUser>, DomainError>;
}
