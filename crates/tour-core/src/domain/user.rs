// ============================================================================
// Tour Core - User Entities
// File: crates/tour-core/src/domain/user.rs
// Description: Tourists (self-registered, earn bonus points) and system users
//              (guides and admins, provisioned by seeding)
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tour_shared::Role;

use super::tour::Interest;
use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Tourist {
    pub id: Uuid,

    #[validate(length(min = 1, message = "Username cannot be empty."))]
    pub username: String,

    #[validate(email(message = "Email is not a valid address."))]
    pub email: String,

    #[validate(length(min = 1, message = "First name cannot be empty."))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name cannot be empty."))]
    pub last_name: String,

    /// Argon2 PHC string
    #[serde(skip_serializing)]
    #[validate(length(min = 1, message = "Password hash cannot be empty."))]
    pub password_hash: String,

    pub wants_recommendations: bool,
    pub interests: Vec<Interest>,
    pub bonus_points: i32,
    pub created_at: DateTime<Utc>,
}

impl Tourist {
    pub fn new(
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        password_hash: String,
        wants_recommendations: bool,
        interests: Vec<Interest>,
    ) -> Result<Self, DomainError> {
        let mut unique_interests: Vec<Interest> = Vec::with_capacity(interests.len());
        for interest in interests {
            if !unique_interests.contains(&interest) {
                unique_interests.push(interest);
            }
        }

        let tourist = Self {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            password_hash,
            wants_recommendations,
            interests: unique_interests,
            bonus_points: 0,
            created_at: Utc::now(),
        };

        tourist.validate()?;
        Ok(tourist)
    }

    pub fn add_bonus_points(&mut self, points: i32) -> Result<(), DomainError> {
        if points < 0 {
            return Err(DomainError::validation("Cannot add negative bonus points."));
        }
        self.bonus_points = self.bonus_points.saturating_add(points);
        Ok(())
    }

    /// Balance never goes below zero
    pub fn spend_bonus_points(&mut self, points: i32) -> Result<(), DomainError> {
        if points < 0 {
            return Err(DomainError::validation("Cannot spend negative bonus points."));
        }
        if points > self.bonus_points {
            return Err(DomainError::InsufficientBonusPoints {
                requested: points,
                available: self.bonus_points,
            });
        }
        self.bonus_points -= points;
        Ok(())
    }
}

/// Guide or admin account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SystemUser {
    pub id: Uuid,

    #[validate(length(min = 1, message = "Username cannot be empty."))]
    pub username: String,

    #[validate(email(message = "Email is not a valid address."))]
    pub email: String,

    pub first_name: String,
    pub last_name: String,
    pub role: Role,

    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl SystemUser {
    pub fn new(
        id: Uuid,
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
        password_hash: String,
    ) -> Result<Self, DomainError> {
        if role == Role::Tourist {
            return Err(DomainError::validation(
                "System users must be guides or admins.",
            ));
        }

        let user = Self {
            id,
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            role,
            password_hash,
        };

        user.validate()?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tourist() -> Tourist {
        Tourist::new(
            "john_doe",
            "john@example.com",
            "John",
            "Doe",
            "$argon2id$hash".to_string(),
            true,
            vec![Interest::Nature, Interest::Food, Interest::Nature],
        )
        .unwrap()
    }

    #[test]
    fn test_new_tourist_has_no_bonus_and_unique_interests() {
        let t = tourist();
        assert_eq!(t.bonus_points, 0);
        assert_eq!(t.interests, vec![Interest::Nature, Interest::Food]);
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let result = Tourist::new("x", "not-an-email", "A", "B", "h".into(), false, vec![]);
        assert_eq!(result.unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_bonus_arithmetic() {
        let mut t = tourist();
        t.add_bonus_points(25).unwrap();
        t.spend_bonus_points(10).unwrap();
        assert_eq!(t.bonus_points, 15);

        assert_eq!(
            t.add_bonus_points(-1).unwrap_err(),
            DomainError::validation("Cannot add negative bonus points.")
        );
        assert_eq!(
            t.spend_bonus_points(-1).unwrap_err(),
            DomainError::validation("Cannot spend negative bonus points.")
        );
    }

    #[test]
    fn test_cannot_overspend() {
        let mut t = tourist();
        t.add_bonus_points(5).unwrap();
        let err = t.spend_bonus_points(6).unwrap_err();
        assert_eq!(err.to_string(), "Cannot spend 6 bonus points. Available: 5.");
        assert_eq!(t.bonus_points, 5);
    }

    #[test]
    fn test_system_user_cannot_be_tourist() {
        let result = SystemUser::new(Uuid::new_v4(), "g", "g@example.com", "G", "U", Role::Tourist, "h".into());
        assert!(result.is_err());
        let guide = SystemUser::new(Uuid::new_v4(), "g", "g@example.com", "G", "U", Role::Guide, "h".into());
        assert!(guide.is_ok());
    }
}
