//! Tour repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{BonusRefund, KeyPoint, Tour, TourVersion};
use crate::error::DomainError;

/// Tours are always loaded with their key points ordered by `order`.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn create(&self, tour: &Tour) -> Result<Tour, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Tour>, DomainError>;
    async fn find_by_guide(&self, guide_id: &Uuid, ascending: bool) -> Result<Vec<Tour>, DomainError>;
    async fn find_published(&self, ascending: bool) -> Result<Vec<Tour>, DomainError>;

    /// Inserts only while the tour is still a Draft; `InvalidOperation` otherwise
    async fn add_key_point(&self, key_point: &KeyPoint) -> Result<KeyPoint, DomainError>;

    /// Persists status, guide and replacement fields if the stored tour still
    /// matches `expected`. `None` when another request got there first.
    async fn update(&self, tour: &Tour, expected: &TourVersion) -> Result<Option<Tour>, DomainError>;

    /// Published, flagged, not yet started tours of other guides, earliest first
    async fn find_needing_replacement(
        &self,
        exclude_guide_id: &Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Tour>, DomainError>;

    /// Published, flagged tours with `after < start_date <= until`
    async fn find_unreplaced_starting_between(
        &self,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Tour>, DomainError>;

    /// Published, unflagged, not yet reminded tours with `from <= start_date <= to`
    async fn find_for_reminder(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Tour>, DomainError>;

    /// Whether the guide has a published tour with `from <= start_date < to`
    async fn has_published_tour_between(
        &self,
        guide_id: &Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Marks the tour reminded. `false` if it already was.
    async fn claim_reminder(&self, tour_id: &Uuid, at: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Store a canceled tour and credit every refund in one transaction.
    /// `false`, with nothing written, if the tour is no longer published and flagged.
    async fn save_cancellation(&self, tour: &Tour, refunds: &[BonusRefund]) -> Result<bool, DomainError>;
}
