// ============================================================================
// Tour Core - Tour Service
// File: crates/tour-core/src/services/tour_service.rs
// ============================================================================
//! Guide-facing tour authoring and public tour browsing

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use tour_shared::SortOrder;

use crate::domain::{Difficulty, Interest, KeyPoint, Tour};
use crate::error::DomainError;
use crate::repositories::TourRepository;

#[derive(Debug, Clone)]
pub struct CreateTourInput {
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: Interest,
    pub price: Decimal,
    pub start_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AddKeyPointInput {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

pub struct TourService {
    tours: Arc<dyn TourRepository>,
}

impl TourService {
    pub fn new(tours: Arc<dyn TourRepository>) -> Self {
        Self { tours }
    }

    pub async fn create_tour(&self, guide_id: Uuid, input: CreateTourInput) -> Result<Tour, DomainError> {
        let tour = Tour::new(
            guide_id,
            &input.name,
            &input.description,
            input.difficulty,
            input.category,
            input.price,
            input.start_date,
        )?;

        let created = self.tours.create(&tour).await?;
        info!("Tour {} created by guide {}", created.id, guide_id);
        Ok(created)
    }

    pub async fn add_key_point(
        &self,
        guide_id: Uuid,
        tour_id: Uuid,
        input: AddKeyPointInput,
    ) -> Result<KeyPoint, DomainError> {
        let mut tour = self.owned_tour(guide_id, tour_id).await?;

        let key_point = tour.add_key_point(
            input.latitude,
            input.longitude,
            &input.name,
            &input.description,
            input.image_url.as_deref(),
        )?;

        self.tours.add_key_point(&key_point).await
    }

    pub async fn publish_tour(&self, guide_id: Uuid, tour_id: Uuid) -> Result<Tour, DomainError> {
        let mut tour = self.owned_tour(guide_id, tour_id).await?;
        let expected = tour.version();

        tour.publish().map_err(|e| match e {
            DomainError::InvalidOperation(message) => DomainError::PublishFailed(message),
            other => other,
        })?;

        let updated = self.tours.update(&tour, &expected).await?.ok_or_else(|| {
            warn!("Tour {} changed while being published", tour_id);
            DomainError::PublishFailed("Tour was changed by another request. Please try again.".into())
        })?;
        info!("Tour {} published", tour_id);
        Ok(updated)
    }

    pub async fn my_tours(&self, guide_id: Uuid, order: SortOrder) -> Result<Vec<Tour>, DomainError> {
        self.tours.find_by_guide(&guide_id, order.is_ascending()).await
    }

    pub async fn published_tours(&self, order: SortOrder) -> Result<Vec<Tour>, DomainError> {
        self.tours.find_published(order.is_ascending()).await
    }

    /// Drafts and canceled tours are only visible to their own guide
    pub async fn get_tour(&self, tour_id: Uuid, viewer_id: Option<Uuid>) -> Result<Tour, DomainError> {
        let tour = self
            .tours
            .find_by_id(&tour_id)
            .await?
            .ok_or(DomainError::TourNotFound)?;

        let is_owner = viewer_id.map(|v| tour.is_owned_by(&v)).unwrap_or(false);
        if !tour.is_published() && !is_owner {
            return Err(DomainError::TourNotFound);
        }
        Ok(tour)
    }

    async fn owned_tour(&self, guide_id: Uuid, tour_id: Uuid) -> Result<Tour, DomainError> {
        let tour = self
            .tours
            .find_by_id(&tour_id)
            .await?
            .ok_or(DomainError::TourNotFound)?;

        if !tour.is_owned_by(&guide_id) {
            warn!("Guide {} tried to modify tour {} owned by {}", guide_id, tour_id, tour.guide_id);
            return Err(DomainError::not_owner());
        }
        Ok(tour)
    }
}
