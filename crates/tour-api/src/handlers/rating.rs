use axum::extract::State;
use uuid::Uuid;

use super::{ok, ApiResult};
use crate::dto::{AverageRatingResponse, CreateRatingRequest, RatingResponse};
use crate::extract::{AppJson, AppPath};
use crate::middleware::TouristUser;
use crate::state::AppState;

/// POST /api/rating
pub async fn create_rating(
    State(state): State<AppState>,
    TouristUser(tourist): TouristUser,
    AppJson(payload): AppJson<CreateRatingRequest>,
) -> ApiResult<RatingResponse> {
    let rating = state
        .ratings
        .create_rating(tourist.user_id, payload.tour_id, payload.score, payload.comment)
        .await?;
    ok(rating.into())
}

/// GET /api/rating/tour/{tourId}
pub async fn ratings_for_tour(
    State(state): State<AppState>,
    AppPath(tour_id): AppPath<Uuid>,
) -> ApiResult<Vec<RatingResponse>> {
    let ratings = state.ratings.ratings_for_tour(tour_id).await?;
    ok(ratings.into_iter().map(Into::into).collect())
}

/// GET /api/rating/tour/{tourId}/average
pub async fn average_rating(
    State(state): State<AppState>,
    AppPath(tour_id): AppPath<Uuid>,
) -> ApiResult<AverageRatingResponse> {
    let average_score = state.ratings.average_for_tour(tour_id).await?;
    ok(AverageRatingResponse { tour_id, average_score })
}
