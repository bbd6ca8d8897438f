//! Tour rating entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;
/// Scores at or below this need a comment
pub const COMMENT_REQUIRED_AT_OR_BELOW: i32 = 2;
pub const RATING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub tour_id: Uuid,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// A tour can be rated from its start until seven days later, inclusive.
    pub fn new(
        tourist_id: Uuid,
        tour_id: Uuid,
        tour_start_date: DateTime<Utc>,
        score: i32,
        comment: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(DomainError::validation("Score must be between 1 and 5."));
        }

        if now < tour_start_date {
            return Err(DomainError::invalid_operation(
                "Cannot rate a tour before it has taken place.",
            ));
        }

        if now - tour_start_date > Duration::days(RATING_WINDOW_DAYS) {
            return Err(DomainError::invalid_operation(
                "Cannot rate a tour more than 7 days after it has taken place.",
            ));
        }

        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        if score <= COMMENT_REQUIRED_AT_OR_BELOW && comment.is_none() {
            return Err(DomainError::validation(
                "A comment is required for ratings of 1 or 2.",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            tourist_id,
            tour_id,
            score,
            comment,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(start: DateTime<Utc>, score: i32, comment: Option<&str>, now: DateTime<Utc>) -> Result<Rating, DomainError> {
        Rating::new(Uuid::new_v4(), Uuid::new_v4(), start, score, comment, now)
    }

    #[test]
    fn test_rating_inside_window() {
        let now = Utc::now();
        let rating = rate(now - Duration::days(2), 5, None, now).unwrap();
        assert_eq!(rating.score, 5);
        assert!(rating.comment.is_none());
    }

    #[test]
    fn test_rating_window_edges() {
        let now = Utc::now();
        assert!(rate(now, 4, None, now).is_ok(), "tour start itself is rateable");
        assert!(rate(now - Duration::days(7), 4, None, now).is_ok());

        let too_early = rate(now + Duration::minutes(1), 4, None, now).unwrap_err();
        assert_eq!(
            too_early,
            DomainError::invalid_operation("Cannot rate a tour before it has taken place.")
        );

        let too_late = rate(now - Duration::days(7) - Duration::seconds(1), 4, None, now).unwrap_err();
        assert_eq!(
            too_late,
            DomainError::invalid_operation("Cannot rate a tour more than 7 days after it has taken place.")
        );
    }

    #[test]
    fn test_low_score_needs_comment() {
        let now = Utc::now();
        let start = now - Duration::days(1);
        for score in [1, 2] {
            assert_eq!(
                rate(start, score, None, now).unwrap_err(),
                DomainError::validation("A comment is required for ratings of 1 or 2.")
            );
            assert!(rate(start, score, Some("   "), now).is_err());
            assert!(rate(start, score, Some("Guide never showed up"), now).is_ok());
        }
        assert!(rate(start, 3, None, now).is_ok());
    }

    #[test]
    fn test_score_out_of_range() {
        let now = Utc::now();
        for score in [0, 6, -1] {
            assert_eq!(
                rate(now, score, Some("x"), now).unwrap_err(),
                DomainError::validation("Score must be between 1 and 5.")
            );
        }
    }
}
