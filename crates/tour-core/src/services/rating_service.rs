// ============================================================================
// Tour Core - Rating Service
// File: crates/tour-core/src/services/rating_service.rs
// ============================================================================
//! Post-tour ratings by tourists who bought the tour

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::Rating;
use crate::error::DomainError;
use crate::repositories::{PurchaseRepository, RatingRepository, TourRepository};

pub struct RatingService {
    tours: Arc<dyn TourRepository>,
    ratings: Arc<dyn RatingRepository>,
    purchases: Arc<dyn PurchaseRepository>,
}

impl RatingService {
    pub fn new(
        tours: Arc<dyn TourRepository>,
        ratings: Arc<dyn RatingRepository>,
        purchases: Arc<dyn PurchaseRepository>,
    ) -> Self {
        Self { tours, ratings, purchases }
    }

    pub async fn create_rating(
        &self,
        tourist_id: Uuid,
        tour_id: Uuid,
        score: i32,
        comment: Option<String>,
    ) -> Result<Rating, DomainError> {
        let tour = self
            .tours
            .find_by_id(&tour_id)
            .await?
            .ok_or(DomainError::TourNotFound)?;

        if !self.purchases.has_purchased(&tourist_id, &tour_id).await? {
            return Err(DomainError::NotPurchased(
                "You can only rate tours you have purchased.".to_string(),
            ));
        }

        if self
            .ratings
            .find_by_tourist_and_tour(&tourist_id, &tour_id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyRated);
        }

        let rating = Rating::new(
            tourist_id,
            tour_id,
            tour.start_date,
            score,
            comment.as_deref(),
            Utc::now(),
        )?;

        let created = self.ratings.create(&rating).await?;
        info!("Tourist {} rated tour {} with {}", tourist_id, tour_id, score);
        Ok(created)
    }

    pub async fn ratings_for_tour(&self, tour_id: Uuid) -> Result<Vec<Rating>, DomainError> {
        self.ensure_tour_exists(tour_id).await?;
        self.ratings.find_by_tour(&tour_id).await
    }

    pub async fn average_for_tour(&self, tour_id: Uuid) -> Result<Option<f64>, DomainError> {
        self.ensure_tour_exists(tour_id).await?;
        self.ratings.average_for_tour(&tour_id).await
    }

    async fn ensure_tour_exists(&self, tour_id: Uuid) -> Result<(), DomainError> {
        self.tours
            .find_by_id(&tour_id)
            .await?
            .map(|_| ())
            .ok_or(DomainError::TourNotFound)
    }
}
