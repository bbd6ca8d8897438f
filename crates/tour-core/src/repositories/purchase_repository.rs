//! Purchase repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Purchase;
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Insert the purchase with its snapshots and move the buyer's balance by
    /// `bonus_points_earned - bonus_points_used` in one transaction. Fails with
    /// `InsufficientBonusPoints` if the balance no longer covers the points used.
    /// Returns the new balance.
    async fn save_checkout(&self, purchase: &Purchase) -> Result<i32, DomainError>;

    /// Newest first
    async fn find_by_tourist(&self, tourist_id: &Uuid) -> Result<Vec<Purchase>, DomainError>;
    async fn has_purchased(&self, tourist_id: &Uuid, tour_id: &Uuid) -> Result<bool, DomainError>;

    /// Distinct tourists who bought the tour
    async fn find_buyer_ids(&self, tour_id: &Uuid) -> Result<Vec<Uuid>, DomainError>;
}
