//! Admin triggers for the periodic jobs

use axum::extract::State;

use tour_core::services::{CancellationReport, JobRunReport, ReminderReport};

use super::{ok, ApiResult};
use crate::middleware::AdminUser;
use crate::state::AppState;

/// POST /api/backgroundjob/cancel-unreplaced-tours
pub async fn cancel_unreplaced_tours(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<CancellationReport> {
    ok(state.jobs.cancel_unreplaced_tours().await?)
}

/// POST /api/backgroundjob/send-reminders
pub async fn send_reminders(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<ReminderReport> {
    ok(state.jobs.send_reminders().await?)
}

/// POST /api/backgroundjob/run-all
pub async fn run_all(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<JobRunReport> {
    ok(state.jobs.run_all().await?)
}
