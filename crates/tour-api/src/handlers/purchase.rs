use axum::extract::State;

use tour_core::services::PurchaseReceipt;

use super::{ok, ApiResult};
use crate::dto::ConfirmPurchaseQuery;
use crate::extract::AppQuery;
use crate::middleware::TouristUser;
use crate::state::AppState;

/// POST /api/purchase/confirm?useBonus=bool
pub async fn confirm_purchase(
    State(state): State<AppState>,
    TouristUser(tourist): TouristUser,
    AppQuery(query): AppQuery<ConfirmPurchaseQuery>,
) -> ApiResult<PurchaseReceipt> {
    ok(state
        .purchases
        .confirm_purchase(tourist.user_id, query.use_bonus)
        .await?)
}

/// GET /api/purchase/my
pub async fn my_purchases(
    State(state): State<AppState>,
    TouristUser(tourist): TouristUser,
) -> ApiResult<Vec<PurchaseReceipt>> {
    ok(state.purchases.my_purchases(tourist.user_id).await?)
}
