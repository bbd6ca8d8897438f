// ============================================================================
// Tour API - Auth Handlers
// File: crates/tour-api/src/handlers/auth.rs
// ============================================================================
//! Tourist registration and login for every role

use axum::extract::State;
use validator::Validate;

use tour_core::services::AuthResult;

use super::{ok, ApiResult};
use crate::dto::{LoginRequest, RegisterTouristRequest};
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/auth/register-tourist
pub async fn register_tourist(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterTouristRequest>,
) -> ApiResult<AuthResult> {
    payload.validate()?;
    ok(state.auth.register_tourist(payload.into()).await?)
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<AuthResult> {
    payload.validate()?;
    ok(state.auth.login(&payload.username, &payload.password).await?)
}
