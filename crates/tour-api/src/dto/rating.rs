use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tour_core::domain::Rating;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    pub tour_id: Uuid,
    pub score: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub tour_id: Uuid,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Rating> for RatingResponse {
    fn from(r: Rating) -> Self {
        Self {
            id: r.id,
            tourist_id: r.tourist_id,
            tour_id: r.tour_id,
            score: r.score,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageRatingResponse {
    pub tour_id: Uuid,
    /// `null` when the tour has no ratings yet
    pub average_score: Option<f64>,
}
