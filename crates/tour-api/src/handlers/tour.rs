// ============================================================================
// Tour API - Tour Handlers
// File: crates/tour-api/src/handlers/tour.rs
// ============================================================================

use axum::extract::State;
use uuid::Uuid;

use super::{ok, ApiResult};
use crate::dto::tour::tour_list;
use crate::dto::{AddKeyPointRequest, CreateTourRequest, KeyPointResponse, SortQuery, TourResponse};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::{GuideUser, MaybeAuthUser};
use crate::state::AppState;

/// POST /api/tour
pub async fn create_tour(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppJson(payload): AppJson<CreateTourRequest>,
) -> ApiResult<TourResponse> {
    let tour = state.tours.create_tour(guide.user_id, payload.into()).await?;
    ok(tour.into())
}

/// POST /api/tour/{tourId}/key-points
pub async fn add_key_point(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppPath(tour_id): AppPath<Uuid>,
    AppJson(payload): AppJson<AddKeyPointRequest>,
) -> ApiResult<KeyPointResponse> {
    let key_point = state
        .tours
        .add_key_point(guide.user_id, tour_id, payload.into())
        .await?;
    ok(key_point.into())
}

/// POST /api/tour/{tourId}/publish
pub async fn publish_tour(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppPath(tour_id): AppPath<Uuid>,
) -> ApiResult<TourResponse> {
    let tour = state.tours.publish_tour(guide.user_id, tour_id).await?;
    ok(tour.into())
}

/// GET /api/tour/my
pub async fn my_tours(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppQuery(query): AppQuery<SortQuery>,
) -> ApiResult<Vec<TourResponse>> {
    let tours = state.tours.my_tours(guide.user_id, query.order()).await?;
    ok(tour_list(tours))
}

/// GET /api/tour/published
pub async fn published_tours(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SortQuery>,
) -> ApiResult<Vec<TourResponse>> {
    let tours = state.tours.published_tours(query.order()).await?;
    ok(tour_list(tours))
}

/// GET /api/tour/{tourId}
pub async fn get_tour(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    AppPath(tour_id): AppPath<Uuid>,
) -> ApiResult<TourResponse> {
    let tour = state
        .tours
        .get_tour(tour_id, viewer.map(|v| v.user_id))
        .await?;
    ok(tour.into())
}
