//! Cart line item

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name and price are captured when the tour is added to the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub tour_id: Uuid,
    pub name: String,
    pub price: Decimal,
}
