use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tour_core::domain::{Difficulty, Interest, KeyPoint, Tour, TourStatus};
use tour_core::services::{AddKeyPointInput, CreateTourInput};
use tour_shared::SortOrder;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTourRequest {
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: Interest,
    pub price: Decimal,
    pub start_date: DateTime<Utc>,
}

impl From<CreateTourRequest> for CreateTourInput {
    fn from(req: CreateTourRequest) -> Self {
        CreateTourInput {
            name: req.name,
            description: req.description,
            difficulty: req.difficulty,
            category: req.category,
            price: req.price,
            start_date: req.start_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddKeyPointRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl From<AddKeyPointRequest> for AddKeyPointInput {
    fn from(req: AddKeyPointRequest) -> Self {
        AddKeyPointInput {
            latitude: req.latitude,
            longitude: req.longitude,
            name: req.name,
            description: req.description,
            image_url: req.image_url,
        }
    }
}

/// `?sort=asc|desc`, ascending unless `desc`
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
}

impl SortQuery {
    pub fn order(&self) -> SortOrder {
        SortOrder::parse(self.sort.as_deref())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPointResponse {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub order: i32,
}

impl From<KeyPoint> for KeyPointResponse {
    fn from(kp: KeyPoint) -> Self {
        Self {
            id: kp.id,
            tour_id: kp.tour_id,
            latitude: kp.latitude,
            longitude: kp.longitude,
            name: kp.name,
            description: kp.description,
            image_url: kp.image_url,
            order: kp.order,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourResponse {
    pub id: Uuid,
    pub guide_id: Uuid,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: Interest,
    pub price: Decimal,
    pub start_date: DateTime<Utc>,
    pub status: TourStatus,
    pub key_points: Vec<KeyPointResponse>,
    pub needs_replacement: bool,
    pub replacement_requested_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Tour> for TourResponse {
    fn from(tour: Tour) -> Self {
        Self {
            id: tour.id,
            guide_id: tour.guide_id,
            name: tour.name,
            description: tour.description,
            difficulty: tour.difficulty,
            category: tour.category,
            price: tour.price,
            start_date: tour.start_date,
            status: tour.status,
            key_points: tour.key_points.into_iter().map(Into::into).collect(),
            needs_replacement: tour.needs_replacement,
            replacement_requested_at: tour.replacement_requested_at,
            created_at: tour.created_at,
        }
    }
}

pub fn tour_list(tours: Vec<Tour>) -> Vec<TourResponse> {
    tours.into_iter().map(Into::into).collect()
}
