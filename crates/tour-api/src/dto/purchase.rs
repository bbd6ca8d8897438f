use serde::Deserialize;

/// `?useBonus=true` redeems bonus points at checkout
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPurchaseQuery {
    #[serde(default)]
    pub use_bonus: bool,
}
