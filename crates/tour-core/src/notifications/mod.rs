//! Outbound notification port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Addressee of a notification
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

impl Recipient {
    pub fn new(email: impl Into<String>, first_name: &str, last_name: &str) -> Self {
        Self {
            email: email.into(),
            name: format!("{} {}", first_name, last_name).trim().to_string(),
        }
    }
}

/// Callers log delivery failures and carry on; no business operation fails on them.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send_purchase_confirmation(
        &self,
        to: &Recipient,
        tour_names: &[String],
        total_price: Decimal,
        bonus_points_used: i32,
        bonus_points_earned: i32,
    ) -> Result<(), NotificationError>;

    async fn send_tour_reminder(
        &self,
        to: &Recipient,
        tour_name: &str,
        tour_description: &str,
        start_date: DateTime<Utc>,
    ) -> Result<(), NotificationError>;

    async fn send_tour_cancellation(
        &self,
        to: &Recipient,
        tour_name: &str,
        start_date: DateTime<Utc>,
        bonus_points_awarded: i32,
    ) -> Result<(), NotificationError>;

    async fn send_problem_notification(
        &self,
        to: &Recipient,
        tour_name: &str,
        problem_title: &str,
        problem_description: &str,
    ) -> Result<(), NotificationError>;
}
