// ============================================================================
// Tour API - Problem Handlers
// File: crates/tour-api/src/handlers/problem.rs
// ============================================================================

use axum::extract::State;
use uuid::Uuid;

use super::{ok, ApiResult};
use crate::dto::{CreateProblemRequest, ProblemEventResponse, ProblemResponse};
use crate::extract::{AppJson, AppPath};
use crate::middleware::{AdminUser, AuthUser, GuideUser, TouristUser};
use crate::state::AppState;

/// POST /api/problem
pub async fn create_problem(
    State(state): State<AppState>,
    TouristUser(tourist): TouristUser,
    AppJson(payload): AppJson<CreateProblemRequest>,
) -> ApiResult<ProblemResponse> {
    let problem = state
        .problems
        .create_problem(tourist.user_id, payload.tour_id, &payload.title, &payload.description)
        .await?;
    ok(problem.into())
}

/// POST /api/problem/{id}/resolve
pub async fn resolve(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<ProblemResponse> {
    ok(state.problems.resolve(id, guide.user_id).await?.into())
}

/// POST /api/problem/{id}/review
pub async fn send_to_review(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<ProblemResponse> {
    ok(state.problems.send_to_review(id, guide.user_id).await?.into())
}

/// POST /api/problem/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<ProblemResponse> {
    ok(state.problems.reject(id, admin.user_id).await?.into())
}

/// POST /api/problem/{id}/reopen
pub async fn reopen(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<ProblemResponse> {
    ok(state.problems.reopen(id, admin.user_id).await?.into())
}

/// GET /api/problem/{id}
pub async fn get_problem(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<ProblemResponse> {
    ok(state.problems.get_problem(id).await?.into())
}

/// GET /api/problem/{id}/events
pub async fn problem_events(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Vec<ProblemEventResponse>> {
    let events = state.problems.problem_events(id).await?;
    ok(events.into_iter().map(Into::into).collect())
}

/// GET /api/problem/tour/{tourId}
pub async fn problems_for_tour(
    State(state): State<AppState>,
    GuideUser(guide): GuideUser,
    AppPath(tour_id): AppPath<Uuid>,
) -> ApiResult<Vec<ProblemResponse>> {
    let problems = state.problems.problems_for_tour(tour_id, guide.user_id).await?;
    ok(problems.into_iter().map(Into::into).collect())
}

/// GET /api/problem/in-review
pub async fn problems_in_review(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Vec<ProblemResponse>> {
    let problems = state.problems.problems_in_review().await?;
    ok(problems.into_iter().map(Into::into).collect())
}
