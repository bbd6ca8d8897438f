//! Purchase with per-tour price snapshots

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Bonus points credited for every completed checkout
pub const BONUS_POINTS_PER_PURCHASE: i32 = 10;

/// Points redeemable against `total`: one point per whole currency unit, never more than the balance
pub fn applicable_bonus_points(balance: i32, total: Decimal) -> i32 {
    if balance <= 0 || total <= Decimal::ZERO {
        return 0;
    }
    let whole_units = total.trunc().to_i32().unwrap_or(i32::MAX);
    balance.min(whole_units)
}

/// Bonus points credited to a tourist whose tour was canceled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusRefund {
    pub tourist_id: Uuid,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedTour {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub tour_id: Uuid,
    pub tour_name: String,
    pub price_at_purchase: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub purchased_at: DateTime<Utc>,
    pub total_price: Decimal,
    pub bonus_points_used: i32,
    pub bonus_points_earned: i32,
    pub purchased_tours: Vec<PurchasedTour>,
}

impl Purchase {
    pub fn new(
        tourist_id: Uuid,
        total_price: Decimal,
        bonus_points_used: i32,
        bonus_points_earned: i32,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if total_price < Decimal::ZERO {
            return Err(DomainError::validation("Total price cannot be negative."));
        }
        if bonus_points_used < 0 {
            return Err(DomainError::validation("Bonus points used cannot be negative."));
        }
        if bonus_points_earned < 0 {
            return Err(DomainError::validation("Bonus points earned cannot be negative."));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            tourist_id,
            purchased_at: now,
            total_price,
            bonus_points_used,
            bonus_points_earned,
            purchased_tours: Vec::new(),
        })
    }

    pub fn add_purchased_tour(
        &mut self,
        tour_id: Uuid,
        tour_name: &str,
        price_at_purchase: Decimal,
    ) -> Result<(), DomainError> {
        if tour_name.trim().is_empty() {
            return Err(DomainError::validation("Tour name cannot be empty."));
        }
        if price_at_purchase < Decimal::ZERO {
            return Err(DomainError::validation("Price cannot be negative."));
        }

        self.purchased_tours.push(PurchasedTour {
            id: Uuid::new_v4(),
            purchase_id: self.id,
            tour_id,
            tour_name: tour_name.trim().to_string(),
            price_at_purchase,
        });
        Ok(())
    }
}
