use axum::extract::State;

use tour_core::services::CartView;

use super::{ok, ApiResult};
use crate::dto::CartItemRequest;
use crate::extract::AppJson;
use crate::middleware::TouristUser;
use crate::state::AppState;

/// GET /api/cart
pub async fn get_cart(State(state): State<AppState>, TouristUser(tourist): TouristUser) -> ApiResult<CartView> {
    ok(state.carts.get_cart(tourist.user_id).await?)
}

/// POST /api/cart/add
pub async fn add_to_cart(
    State(state): State<AppState>,
    TouristUser(tourist): TouristUser,
    AppJson(payload): AppJson<CartItemRequest>,
) -> ApiResult<CartView> {
    ok(state.carts.add_to_cart(tourist.user_id, payload.tour_id).await?)
}

/// POST /api/cart/remove
pub async fn remove_from_cart(
    State(state): State<AppState>,
    TouristUser(tourist): TouristUser,
    AppJson(payload): AppJson<CartItemRequest>,
) -> ApiResult<CartView> {
    ok(state.carts.remove_from_cart(tourist.user_id, payload.tour_id).await?)
}
