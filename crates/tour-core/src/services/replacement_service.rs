// ============================================================================
// Tour Core - Replacement Service
// File: crates/tour-core/src/services/replacement_service.rs
// ============================================================================
//! Guides hand published tours over to other guides

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Tour, TourVersion};
use crate::error::DomainError;
use crate::repositories::TourRepository;

pub struct ReplacementService {
    tours: Arc<dyn TourRepository>,
}

impl ReplacementService {
    pub fn new(tours: Arc<dyn TourRepository>) -> Self {
        Self { tours }
    }

    pub async fn request_replacement(&self, guide_id: Uuid, tour_id: Uuid) -> Result<Tour, DomainError> {
        let mut tour = self.owned_tour(guide_id, tour_id).await?;
        let expected = tour.version();
        tour.request_replacement(Utc::now())?;

        let updated = self.save(&tour, &expected, DomainError::changed_concurrently("Tour")).await?;
        info!("Guide {} requested a replacement for tour {}", guide_id, tour_id);
        Ok(updated)
    }

    pub async fn cancel_replacement_request(&self, guide_id: Uuid, tour_id: Uuid) -> Result<Tour, DomainError> {
        let mut tour = self.owned_tour(guide_id, tour_id).await?;
        let expected = tour.version();
        tour.cancel_replacement()?;

        let updated = self.save(&tour, &expected, DomainError::changed_concurrently("Tour")).await?;
        info!("Guide {} withdrew the replacement request for tour {}", guide_id, tour_id);
        Ok(updated)
    }

    /// Tours other guides are asking to hand over
    pub async fn replacement_tours(&self, guide_id: Uuid) -> Result<Vec<Tour>, DomainError> {
        self.tours.find_needing_replacement(&guide_id, Utc::now()).await
    }

    pub async fn take_over(&self, new_guide_id: Uuid, tour_id: Uuid) -> Result<Tour, DomainError> {
        // 1. Tour must exist and be up for takeover
        let mut tour = self
            .tours
            .find_by_id(&tour_id)
            .await?
            .ok_or(DomainError::TourNotFound)?;

        if !tour.needs_replacement {
            return Err(DomainError::NotAvailable);
        }

        // 2. Not your own
        if tour.is_owned_by(&new_guide_id) {
            return Err(DomainError::invalid_operation("You cannot take over your own tour."));
        }

        // 3. One published tour per guide per calendar day (UTC)
        let (day_start, day_end) = day_bounds(tour.start_date);
        if self
            .tours
            .has_published_tour_between(&new_guide_id, day_start, day_end)
            .await?
        {
            warn!("Guide {} has a schedule conflict for tour {}", new_guide_id, tour_id);
            return Err(DomainError::ScheduleConflict);
        }

        // 4. Reassign, unless another guide or the owner got there first
        let expected = tour.version();
        let previous_guide = tour.guide_id;
        tour.assign_new_guide(new_guide_id)?;
        let updated = self.save(&tour, &expected, DomainError::NotAvailable).await?;

        info!(
            "Tour {} taken over by guide {} from guide {}",
            tour_id, new_guide_id, previous_guide
        );
        Ok(updated)
    }

    async fn save(&self, tour: &Tour, expected: &TourVersion, stale: DomainError) -> Result<Tour, DomainError> {
        match self.tours.update(tour, expected).await? {
            Some(updated) => Ok(updated),
            None => {
                warn!("Tour {} changed concurrently, replacement update dropped", tour.id);
                Err(stale)
            }
        }
    }

    async fn owned_tour(&self, guide_id: Uuid, tour_id: Uuid) -> Result<Tour, DomainError> {
        let tour = self
            .tours
            .find_by_id(&tour_id)
            .await?
            .ok_or(DomainError::TourNotFound)?;

        if !tour.is_owned_by(&guide_id) {
            return Err(DomainError::not_owner());
        }
        Ok(tour)
    }
}

/// Midnight-to-midnight UTC window containing `at`
fn day_bounds(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = at
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|d| d.and_utc())
        .unwrap_or(at);
    (start, start + Duration::days(1))
}
