use axum::extract::State;

use tour_core::services::BlockedUser;

use super::{ok, ApiResult};
use crate::extract::AppPath;
use crate::middleware::AdminUser;
use crate::state::AppState;

/// GET /api/admin/blocked-users
pub async fn blocked_users(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Vec<BlockedUser>> {
    ok(state.admin.blocked_users().await?)
}

/// POST /api/admin/unblock/{username}
pub async fn unblock_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(username): AppPath<String>,
) -> ApiResult<String> {
    tracing::info!("Admin {} unblocking {}", admin.username, username);
    ok(state.admin.unblock_user(&username).await?)
}
