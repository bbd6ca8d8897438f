// ============================================================================
// Tour Core - Background Job Service
// File: crates/tour-core/src/services/background_job_service.rs
// ============================================================================
//! Periodic jobs: cancel tours nobody took over, remind buyers of upcoming tours

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{BonusRefund, Tour};
use crate::error::DomainError;
use crate::notifications::{EmailService, Recipient};
use crate::repositories::{PurchaseRepository, TourRepository, UserRepository};

/// Flagged tours starting sooner than this are canceled
pub const CANCELLATION_WINDOW_HOURS: i64 = 24;
/// Reminders go out for tours starting between these offsets
pub const REMINDER_WINDOW_START_HOURS: i64 = 47;
pub const REMINDER_WINDOW_END_HOURS: i64 = 49;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanceledTourReport {
    pub tour_id: Uuid,
    pub tour_name: String,
    pub start_date: DateTime<Utc>,
    pub tourists_affected: usize,
    pub bonus_points_awarded: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationReport {
    pub tours_canceled: usize,
    pub tourists_refunded: usize,
    pub total_bonus_points_awarded: i32,
    pub canceled_tours: Vec<CanceledTourReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourReminderReport {
    pub tour_id: Uuid,
    pub tour_name: String,
    pub start_date: DateTime<Utc>,
    pub tourists_notified: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderReport {
    pub tour_count: usize,
    pub reminders_sent: usize,
    pub tours: Vec<TourReminderReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRunReport {
    pub cancellation_result: CancellationReport,
    pub reminder_result: ReminderReport,
}

pub struct BackgroundJobService {
    tours: Arc<dyn TourRepository>,
    purchases: Arc<dyn PurchaseRepository>,
    users: Arc<dyn UserRepository>,
    email: Arc<dyn EmailService>,
}

impl BackgroundJobService {
    pub fn new(
        tours: Arc<dyn TourRepository>,
        purchases: Arc<dyn PurchaseRepository>,
        users: Arc<dyn UserRepository>,
        email: Arc<dyn EmailService>,
    ) -> Self {
        Self { tours, purchases, users, email }
    }

    pub async fn cancel_unreplaced_tours(&self) -> Result<CancellationReport, DomainError> {
        self.cancel_unreplaced_tours_at(Utc::now()).await
    }

    pub async fn send_reminders(&self) -> Result<ReminderReport, DomainError> {
        self.send_reminders_at(Utc::now()).await
    }

    pub async fn run_all(&self) -> Result<JobRunReport, DomainError> {
        let now = Utc::now();
        Ok(JobRunReport {
            cancellation_result: self.cancel_unreplaced_tours_at(now).await?,
            reminder_result: self.send_reminders_at(now).await?,
        })
    }

    pub async fn cancel_unreplaced_tours_at(&self, now: DateTime<Utc>) -> Result<CancellationReport, DomainError> {
        let due = self
            .tours
            .find_unreplaced_starting_between(now, now + Duration::hours(CANCELLATION_WINDOW_HOURS))
            .await?;

        let mut report = CancellationReport::default();
        for mut tour in due {
            let buyers = self.purchases.find_buyer_ids(&tour.id).await?;
            let points = tour.price.trunc().to_i32().unwrap_or(0);
            let refunds: Vec<BonusRefund> = if points > 0 {
                buyers
                    .iter()
                    .map(|&tourist_id| BonusRefund { tourist_id, points })
                    .collect()
            } else {
                Vec::new()
            };

            tour.cancel()?;
            if !self.tours.save_cancellation(&tour, &refunds).await? {
                warn!("Tour {} was taken over or changed before cancellation, skipped", tour.id);
                continue;
            }

            let awarded = points.max(0) * refunds.len() as i32;
            info!(
                "Canceled tour {} ({}): {} tourists refunded {} points each",
                tour.id,
                tour.name,
                refunds.len(),
                points
            );
            self.notify_cancellation(&tour, &buyers, points).await;

            report.tours_canceled += 1;
            report.tourists_refunded += refunds.len();
            report.total_bonus_points_awarded += awarded;
            report.canceled_tours.push(CanceledTourReport {
                tour_id: tour.id,
                tour_name: tour.name.clone(),
                start_date: tour.start_date,
                tourists_affected: buyers.len(),
                bonus_points_awarded: awarded,
            });
        }

        Ok(report)
    }

    pub async fn send_reminders_at(&self, now: DateTime<Utc>) -> Result<ReminderReport, DomainError> {
        let upcoming = self
            .tours
            .find_for_reminder(
                now + Duration::hours(REMINDER_WINDOW_START_HOURS),
                now + Duration::hours(REMINDER_WINDOW_END_HOURS),
            )
            .await?;

        let mut report = ReminderReport::default();

        for tour in upcoming {
            // Each tour is reminded once, whichever run claims it first
            if !self.tours.claim_reminder(&tour.id, now).await? {
                continue;
            }
            report.tour_count += 1;

            let buyers = self.purchases.find_buyer_ids(&tour.id).await?;
            let tourists = self.users.find_tourists_by_ids(&buyers).await?;

            let mut notified = 0;
            for tourist in &tourists {
                let recipient = Recipient::new(tourist.email.clone(), &tourist.first_name, &tourist.last_name);
                match self
                    .email
                    .send_tour_reminder(&recipient, &tour.name, &tour.description, tour.start_date)
                    .await
                {
                    Ok(()) => notified += 1,
                    Err(e) => warn!("Reminder for tour {} to tourist {} failed: {}", tour.id, tourist.id, e),
                }
            }

            report.reminders_sent += notified;
            report.tours.push(TourReminderReport {
                tour_id: tour.id,
                tour_name: tour.name.clone(),
                start_date: tour.start_date,
                tourists_notified: notified,
            });
        }

        info!("Sent {} reminders for {} tours", report.reminders_sent, report.tour_count);
        Ok(report)
    }

    async fn notify_cancellation(&self, tour: &Tour, buyers: &[Uuid], points: i32) {
        if buyers.is_empty() {
            return;
        }
        let tourists = match self.users.find_tourists_by_ids(buyers).await {
            Ok(tourists) => tourists,
            Err(e) => {
                warn!("Could not load buyers of canceled tour {}: {}", tour.id, e);
                return;
            }
        };

        for tourist in tourists {
            let recipient = Recipient::new(tourist.email.clone(), &tourist.first_name, &tourist.last_name);
            if let Err(e) = self
                .email
                .send_tour_cancellation(&recipient, &tour.name, tour.start_date, points.max(0))
                .await
            {
                warn!("Cancellation notice for tour {} to tourist {} failed: {}", tour.id, tourist.id, e);
            }
        }
    }
}
