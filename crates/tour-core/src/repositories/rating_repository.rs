//! Rating repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Rating;
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn create(&self, rating: &Rating) -> Result<Rating, DomainError>;
    async fn find_by_tourist_and_tour(
        &self,
        tourist_id: &Uuid,
        tour_id: &Uuid,
    ) -> Result<Option<Rating>, DomainError>;

    /// Newest first
    async fn find_by_tour(&self, tour_id: &Uuid) -> Result<Vec<Rating>, DomainError>;

    /// `None` when the tour has no ratings
    async fn average_for_tour(&self, tour_id: &Uuid) -> Result<Option<f64>, DomainError>;
}
