// ============================================================================
// Tour Infrastructure - Logging Email Sender
// File: crates/tour-infrastructure/src/notifications/log_email.rs
// Description: EmailService that records each message as a structured tracing
//              event instead of delivering it
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use tour_core::notifications::{EmailService, NotificationError, Recipient};
use tour_shared::utils::mask_email;

#[derive(Debug, Clone, Default)]
pub struct LogEmailService;

impl LogEmailService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailService for LogEmailService {
    async fn send_purchase_confirmation(
        &self,
        to: &Recipient,
        tour_names: &[String],
        total_price: Decimal,
        bonus_points_used: i32,
        bonus_points_earned: i32,
    ) -> Result<(), NotificationError> {
        info!(
            target: "email",
            kind = "purchase_confirmation",
            to = %mask_email(&to.email),
            name = %to.name,
            tours = %tour_names.join(", "),
            %total_price,
            bonus_points_used,
            bonus_points_earned,
            "Purchase confirmation sent"
        );
        Ok(())
    }

    async fn send_tour_reminder(
        &self,
        to: &Recipient,
        tour_name: &str,
        tour_description: &str,
        start_date: DateTime<Utc>,
    ) -> Result<(), NotificationError> {
        info!(
            target: "email",
            kind = "tour_reminder",
            to = %mask_email(&to.email),
            name = %to.name,
            tour = tour_name,
            description = tour_description,
            start_date = %start_date.to_rfc3339(),
            "Tour reminder sent"
        );
        Ok(())
    }

    async fn send_tour_cancellation(
        &self,
        to: &Recipient,
        tour_name: &str,
        start_date: DateTime<Utc>,
        bonus_points_awarded: i32,
    ) -> Result<(), NotificationError> {
        info!(
            target: "email",
            kind = "tour_cancellation",
            to = %mask_email(&to.email),
            name = %to.name,
            tour = tour_name,
            start_date = %start_date.to_rfc3339(),
            bonus_points_awarded,
            "Tour cancellation notice sent"
        );
        Ok(())
    }

    async fn send_problem_notification(
        &self,
        to: &Recipient,
        tour_name: &str,
        problem_title: &str,
        problem_description: &str,
    ) -> Result<(), NotificationError> {
        info!(
            target: "email",
            kind = "problem_notification",
            to = %mask_email(&to.email),
            name = %to.name,
            tour = tour_name,
            title = problem_title,
            description_len = problem_description.len(),
            "Problem notification sent to guide"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_email_never_fails() {
        let service = LogEmailService::new();
        let to = Recipient::new("jane.smith@example.com", "Jane", "Smith");

        assert!(service
            .send_purchase_confirmation(&to, &["Food Market Experience".into()], Decimal::from(95), 10, 10)
            .await
            .is_ok());
        assert!(service
            .send_tour_reminder(&to, "Food Market Experience", "Tasting stalls at the old market", Utc::now())
            .await
            .is_ok());
        assert!(service
            .send_tour_cancellation(&to, "Food Market Experience", Utc::now(), 95)
            .await
            .is_ok());
        assert!(service
            .send_problem_notification(&to, "Food Market Experience", "Late", "Guide was late")
            .await
            .is_ok());
    }
}
