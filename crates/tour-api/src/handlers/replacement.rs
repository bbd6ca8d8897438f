use axum::extract::State;
use uuid::Uuid;

use super::{ok, ApiResult};
use crate::dto::tour::tour_list;
use crate::dto::TourResponse;
use crate::extract::AppPath;
use crate::middleware::GuideUser;
use crate::state::AppState;

/// POST /api/replacement/request/{tourId}
pub async fn request_replacement(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppPath(tour_id): AppPath<Uuid>,
) -> ApiResult<TourResponse> {
    let tour = state.replacements.request_replacement(guide.user_id, tour_id).await?;
    ok(tour.into())
}

/// POST /api/replacement/cancel/{tourId}
pub async fn cancel_replacement(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppPath(tour_id): AppPath<Uuid>,
) -> ApiResult<TourResponse> {
    let tour = state
        .replacements
        .cancel_replacement_request(guide.user_id, tour_id)
        .await?;
    ok(tour.into())
}

/// GET /api/replacement
pub async fn replacement_tours(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
) -> ApiResult<Vec<TourResponse>> {
    let tours = state.replacements.replacement_tours(guide.user_id).await?;
    ok(tour_list(tours))
}

/// POST /api/replacement/take/{tourId}
pub async fn take_over(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppPath(tour_id): AppPath<Uuid>,
) -> ApiResult<TourResponse> {
    let tour = state.replacements.take_over(guide.user_id, tour_id).await?;
    ok(tour.into())
}
