// ============================================================================
// Tour Core - Tour Entity
// File: crates/tour-core/src/domain/tour.rs
// Description: Tour aggregate with key points and the draft/publish/cancel lifecycle
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// Minimum number of key points a tour needs before it can be published
pub const MIN_KEY_POINTS_TO_PUBLISH: usize = 2;

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Interest category, shared by tours and tourist preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interest {
    #[default]
    Nature,
    Art,
    Sport,
    Shopping,
    Food,
}

impl Interest {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interest::Nature => "Nature",
            Interest::Art => "Art",
            Interest::Sport => "Sport",
            Interest::Shopping => "Shopping",
            Interest::Food => "Food",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nature" => Some(Interest::Nature),
            "art" => Some(Interest::Art),
            "sport" => Some(Interest::Sport),
            "shopping" => Some(Interest::Shopping),
            "food" => Some(Interest::Food),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TourStatus {
    #[default]
    Draft,
    Published,
    Canceled,
}

impl TourStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourStatus::Draft => "Draft",
            TourStatus::Published => "Published",
            TourStatus::Canceled => "Canceled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(TourStatus::Draft),
            "published" => Some(TourStatus::Published),
            "canceled" => Some(TourStatus::Canceled),
            _ => None,
        }
    }
}

/// Waypoint on a tour. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct KeyPoint {
    pub id: Uuid,
    pub tour_id: Uuid,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90."))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180."))]
    pub longitude: f64,

    #[validate(length(min = 1, message = "Key point name cannot be empty."))]
    pub name: String,

    #[validate(length(min = 1, message = "Key point description cannot be empty."))]
    pub description: String,

    pub image_url: String,
    pub order: i32,
}

impl KeyPoint {
    pub fn new(
        tour_id: Uuid,
        latitude: f64,
        longitude: f64,
        name: &str,
        description: &str,
        image_url: Option<&str>,
        order: i32,
    ) -> Result<Self, DomainError> {
        let key_point = Self {
            id: Uuid::new_v4(),
            tour_id,
            latitude,
            longitude,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            image_url: image_url.map(|u| u.trim().to_string()).unwrap_or_default(),
            order,
        };

        key_point.validate()?;
        Ok(key_point)
    }
}

/// The fields tour guards read. A stored tour is only overwritten while
/// these still match what the caller loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourVersion {
    pub guide_id: Uuid,
    pub status: TourStatus,
    pub needs_replacement: bool,
}

/// Tour aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Tour {
    pub id: Uuid,
    pub guide_id: Uuid,

    #[validate(length(min = 1, message = "Name cannot be empty."))]
    pub name: String,

    #[validate(length(min = 1, message = "Description cannot be empty."))]
    pub description: String,

    pub difficulty: Difficulty,
    pub category: Interest,
    pub price: Decimal,
    pub start_date: DateTime<Utc>,
    pub status: TourStatus,
    pub key_points: Vec<KeyPoint>,
    pub needs_replacement: bool,
    pub replacement_requested_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Tour {
    /// Create a new tour in Draft
    pub fn new(
        guide_id: Uuid,
        name: &str,
        description: &str,
        difficulty: Difficulty,
        category: Interest,
        price: Decimal,
        start_date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if price < Decimal::ZERO {
            return Err(DomainError::validation("Price cannot be negative."));
        }

        let tour = Self {
            id: Uuid::new_v4(),
            guide_id,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            difficulty,
            category,
            price,
            start_date,
            status: TourStatus::Draft,
            key_points: Vec::new(),
            needs_replacement: false,
            replacement_requested_at: None,
            created_at: Utc::now(),
        };

        tour.validate()?;
        Ok(tour)
    }

    pub fn version(&self) -> TourVersion {
        TourVersion {
            guide_id: self.guide_id,
            status: self.status,
            needs_replacement: self.needs_replacement,
        }
    }

    pub fn is_owned_by(&self, guide_id: &Uuid) -> bool {
        self.guide_id == *guide_id
    }

    pub fn is_published(&self) -> bool {
        self.status == TourStatus::Published
    }

    /// Append a key point; its order is the number of key points before it
    pub fn add_key_point(
        &mut self,
        latitude: f64,
        longitude: f64,
        name: &str,
        description: &str,
        image_url: Option<&str>,
    ) -> Result<KeyPoint, DomainError> {
        match self.status {
            TourStatus::Published => {
                return Err(DomainError::invalid_operation(
                    "Cannot add key points to a published tour.",
                ))
            }
            TourStatus::Canceled => {
                return Err(DomainError::invalid_operation(
                    "Cannot add key points to a canceled tour.",
                ))
            }
            TourStatus::Draft => {}
        }

        let order = self.key_points.len() as i32;
        let key_point = KeyPoint::new(self.id, latitude, longitude, name, description, image_url, order)?;
        self.key_points.push(key_point.clone());
        Ok(key_point)
    }

    pub fn publish(&mut self) -> Result<(), DomainError> {
        if self.status == TourStatus::Published {
            return Err(DomainError::invalid_operation("Tour is already published."));
        }
        if self.status == TourStatus::Canceled {
            return Err(DomainError::invalid_operation("Cannot publish a canceled tour."));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_operation("Tour must have a name before publishing."));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::invalid_operation(
                "Tour must have a description before publishing.",
            ));
        }
        if self.key_points.len() < MIN_KEY_POINTS_TO_PUBLISH {
            return Err(DomainError::invalid_operation(
                "Tour must have at least 2 key points before publishing.",
            ));
        }

        self.status = TourStatus::Published;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if self.status == TourStatus::Canceled {
            return Err(DomainError::invalid_operation("Tour is already canceled."));
        }
        self.status = TourStatus::Canceled;
        self.needs_replacement = false;
        Ok(())
    }

    /// Flag a published, not yet started tour as needing another guide
    pub fn request_replacement(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != TourStatus::Published {
            return Err(DomainError::invalid_operation(
                "Only published tours can request a replacement guide.",
            ));
        }
        if self.needs_replacement {
            return Err(DomainError::invalid_operation(
                "A replacement has already been requested for this tour.",
            ));
        }
        if self.start_date <= now {
            return Err(DomainError::invalid_operation(
                "Cannot request a replacement for a tour that has already started.",
            ));
        }

        self.needs_replacement = true;
        self.replacement_requested_at = Some(now);
        Ok(())
    }

    pub fn cancel_replacement(&mut self) -> Result<(), DomainError> {
        if !self.needs_replacement {
            return Err(DomainError::invalid_operation(
                "No replacement request is pending for this tour.",
            ));
        }
        self.needs_replacement = false;
        self.replacement_requested_at = None;
        Ok(())
    }

    /// Hand the tour to the guide taking it over and clear the replacement flag
    pub fn assign_new_guide(&mut self, new_guide_id: Uuid) -> Result<(), DomainError> {
        if !self.needs_replacement {
            return Err(DomainError::invalid_operation(
                "This tour does not need a replacement guide.",
            ));
        }
        if self.status != TourStatus::Published {
            return Err(DomainError::invalid_operation(
                "Only published tours can be taken over.",
            ));
        }
        self.guide_id = new_guide_id;
        self.needs_replacement = false;
        self.replacement_requested_at = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft() -> Tour {
        Tour::new(
            Uuid::new_v4(),
            "Old Town Walk",
            "Two hours through the old town",
            Difficulty::Easy,
            Interest::Art,
            Decimal::new(4999, 2),
            Utc::now() + Duration::days(10),
        )
        .unwrap()
    }

    fn with_key_points(mut tour: Tour, count: usize) -> Tour {
        for i in 0..count {
            tour.add_key_point(45.0, 19.0, &format!("Stop {}", i), "A stop", None).unwrap();
        }
        tour
    }

    #[test]
    fn test_new_tour_starts_as_draft() {
        let tour = draft();
        assert_eq!(tour.status, TourStatus::Draft);
        assert!(tour.key_points.is_empty());
        assert!(!tour.needs_replacement);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let result = Tour::new(
            Uuid::new_v4(),
            "   ",
            "desc",
            Difficulty::Hard,
            Interest::Sport,
            Decimal::ZERO,
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), DomainError::validation("Name cannot be empty."));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let result = Tour::new(
            Uuid::new_v4(),
            "Tour",
            "desc",
            Difficulty::Hard,
            Interest::Sport,
            Decimal::from(-1),
            Utc::now(),
        );
        assert_eq!(result.unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_key_points_are_ordered_by_insertion() {
        let tour = with_key_points(draft(), 3);
        let orders: Vec<i32> = tour.key_points.iter().map(|k| k.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert!(tour.key_points.iter().all(|k| k.image_url.is_empty()));
    }

    #[test]
    fn test_key_point_coordinates_are_range_checked() {
        let mut tour = draft();
        let err = tour.add_key_point(90.5, 0.0, "North", "Too far", None).unwrap_err();
        assert_eq!(err, DomainError::validation("Latitude must be between -90 and 90."));

        let err = tour.add_key_point(0.0, -180.01, "West", "Too far", None).unwrap_err();
        assert_eq!(err, DomainError::validation("Longitude must be between -180 and 180."));

        assert!(tour.add_key_point(-90.0, 180.0, "Edge", "Exactly on the edge", None).is_ok());
    }

    #[test]
    fn test_publish_requires_two_key_points() {
        let mut tour = with_key_points(draft(), 1);
        let err = tour.publish().unwrap_err();
        assert_eq!(
            err,
            DomainError::invalid_operation("Tour must have at least 2 key points before publishing.")
        );
        assert_eq!(tour.status, TourStatus::Draft);

        tour.add_key_point(1.0, 1.0, "Second", "Second stop", None).unwrap();
        tour.publish().unwrap();
        assert_eq!(tour.status, TourStatus::Published);
    }

    #[test]
    fn test_cannot_publish_twice_or_after_cancel() {
        let mut tour = with_key_points(draft(), 2);
        tour.publish().unwrap();
        assert_eq!(
            tour.publish().unwrap_err(),
            DomainError::invalid_operation("Tour is already published.")
        );

        tour.cancel().unwrap();
        assert_eq!(
            tour.publish().unwrap_err(),
            DomainError::invalid_operation("Cannot publish a canceled tour.")
        );
        assert_eq!(
            tour.cancel().unwrap_err(),
            DomainError::invalid_operation("Tour is already canceled.")
        );
    }

    #[test]
    fn test_key_points_blocked_after_publish_and_cancel() {
        let mut tour = with_key_points(draft(), 2);
        tour.publish().unwrap();
        assert_eq!(
            tour.add_key_point(1.0, 1.0, "Late", "Late stop", None).unwrap_err(),
            DomainError::invalid_operation("Cannot add key points to a published tour.")
        );

        let mut canceled = draft();
        canceled.cancel().unwrap();
        assert_eq!(
            canceled.add_key_point(1.0, 1.0, "Late", "Late stop", None).unwrap_err(),
            DomainError::invalid_operation("Cannot add key points to a canceled tour.")
        );
    }

    #[test]
    fn test_replacement_request_lifecycle() {
        let now = Utc::now();
        let mut tour = with_key_points(draft(), 2);
        assert!(tour.request_replacement(now).is_err(), "draft tours cannot be handed over");

        tour.publish().unwrap();
        tour.request_replacement(now).unwrap();
        assert!(tour.needs_replacement);
        assert_eq!(tour.replacement_requested_at, Some(now));
        assert!(tour.request_replacement(now).is_err());

        tour.cancel_replacement().unwrap();
        assert!(!tour.needs_replacement);
        assert!(tour.replacement_requested_at.is_none());
        assert!(tour.cancel_replacement().is_err());
    }

    #[test]
    fn test_replacement_not_allowed_once_started() {
        let mut tour = with_key_points(draft(), 2);
        tour.publish().unwrap();
        let after_start = tour.start_date + Duration::minutes(1);
        assert!(tour.request_replacement(after_start).is_err());
    }

    #[test]
    fn test_assign_new_guide_clears_flag() {
        let mut tour = with_key_points(draft(), 2);
        tour.publish().unwrap();
        let new_guide = Uuid::new_v4();
        assert!(tour.assign_new_guide(new_guide).is_err());

        tour.request_replacement(Utc::now()).unwrap();
        tour.assign_new_guide(new_guide).unwrap();
        assert!(tour.is_owned_by(&new_guide));
        assert!(!tour.needs_replacement);
    }

    #[test]
    fn test_enum_text_round_trip() {
        assert_eq!(TourStatus::from_str(TourStatus::Canceled.as_str()), Some(TourStatus::Canceled));
        assert_eq!(Difficulty::from_str("MEDIUM"), Some(Difficulty::Medium));
        assert_eq!(Interest::from_str("food"), Some(Interest::Food));
        assert_eq!(Interest::from_str("opera"), None);
    }
}
