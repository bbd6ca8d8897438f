// ============================================================================
// Tour Core - Purchase Service
// File: crates/tour-core/src/services/purchase_service.rs
// ============================================================================
//! Checkout of the tourist's cart and purchase history

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cart::CartStore;
use crate::domain::{
    applicable_bonus_points, Purchase, PurchasedTour, TourStatus, BONUS_POINTS_PER_PURCHASE,
};
use crate::error::DomainError;
use crate::notifications::{EmailService, Recipient};
use crate::repositories::{PurchaseRepository, TourRepository, UserRepository};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedTourLine {
    pub tour_id: Uuid,
    pub tour_name: String,
    pub price_at_purchase: Decimal,
}

impl From<&PurchasedTour> for PurchasedTourLine {
    fn from(pt: &PurchasedTour) -> Self {
        Self {
            tour_id: pt.tour_id,
            tour_name: pt.tour_name.clone(),
            price_at_purchase: pt.price_at_purchase,
        }
    }
}

/// Checkout receipt; history entries carry no current balance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub purchase_id: Uuid,
    pub original_price: Decimal,
    pub final_price: Decimal,
    pub bonus_points_used: i32,
    pub bonus_points_earned: i32,
    pub total_bonus_points: Option<i32>,
    pub purchased_at: DateTime<Utc>,
    pub tours: Vec<PurchasedTourLine>,
}

impl PurchaseReceipt {
    fn from_purchase(purchase: &Purchase, total_bonus_points: Option<i32>) -> Self {
        Self {
            purchase_id: purchase.id,
            original_price: purchase.purchased_tours.iter().map(|pt| pt.price_at_purchase).sum(),
            final_price: purchase.total_price,
            bonus_points_used: purchase.bonus_points_used,
            bonus_points_earned: purchase.bonus_points_earned,
            total_bonus_points,
            purchased_at: purchase.purchased_at,
            tours: purchase.purchased_tours.iter().map(PurchasedTourLine::from).collect(),
        }
    }
}

pub struct PurchaseService {
    tours: Arc<dyn TourRepository>,
    purchases: Arc<dyn PurchaseRepository>,
    users: Arc<dyn UserRepository>,
    carts: Arc<CartStore>,
    email: Arc<dyn EmailService>,
}

impl PurchaseService {
    pub fn new(
        tours: Arc<dyn TourRepository>,
        purchases: Arc<dyn PurchaseRepository>,
        users: Arc<dyn UserRepository>,
        carts: Arc<CartStore>,
        email: Arc<dyn EmailService>,
    ) -> Self {
        Self { tours, purchases, users, carts, email }
    }

    pub async fn confirm_purchase(&self, tourist_id: Uuid, use_bonus: bool) -> Result<PurchaseReceipt, DomainError> {
        // 1. Cart and buyer
        let items = self.carts.items(tourist_id);
        if items.is_empty() {
            return Err(DomainError::CartEmpty);
        }

        let mut tourist = self
            .users
            .find_tourist_by_id(&tourist_id)
            .await?
            .ok_or(DomainError::TouristNotFound)?;

        // 2. Every tour must still be on sale
        for item in &items {
            let tour = self
                .tours
                .find_by_id(&item.tour_id)
                .await?
                .ok_or_else(|| DomainError::TourNotFoundNamed(format!("Tour '{}' not found.", item.name)))?;

            if tour.status != TourStatus::Published {
                return Err(DomainError::TourNotPublished(format!(
                    "Tour '{}' is no longer available.",
                    item.name
                )));
            }
        }

        // 3. Prices come from the cart snapshots
        let original_price = CartStore::total(&items);
        let bonus_points_used = if use_bonus {
            applicable_bonus_points(tourist.bonus_points, original_price)
        } else {
            0
        };
        let final_price = (original_price - Decimal::from(bonus_points_used)).max(Decimal::ZERO);
        tourist.spend_bonus_points(bonus_points_used)?;
        tourist.add_bonus_points(BONUS_POINTS_PER_PURCHASE)?;

        let mut purchase = Purchase::new(
            tourist_id,
            final_price,
            bonus_points_used,
            BONUS_POINTS_PER_PURCHASE,
            Utc::now(),
        )?;
        for item in &items {
            purchase.add_purchased_tour(item.tour_id, &item.name, item.price)?;
        }

        // 4. Persist purchase and balance change together
        let new_balance = self.purchases.save_checkout(&purchase).await?;
        self.carts.clear(tourist_id);
        if new_balance != tourist.bonus_points {
            warn!(
                "Tourist {} balance moved during checkout: expected {}, stored {}",
                tourist_id, tourist.bonus_points, new_balance
            );
        }

        info!(
            "Purchase {} confirmed for tourist {}: {} tours, {} points used, balance {}",
            purchase.id,
            tourist_id,
            purchase.purchased_tours.len(),
            bonus_points_used,
            new_balance
        );

        // 5. Confirmation email
        let tour_names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
        let recipient = Recipient::new(tourist.email.clone(), &tourist.first_name, &tourist.last_name);
        if let Err(e) = self
            .email
            .send_purchase_confirmation(
                &recipient,
                &tour_names,
                final_price,
                bonus_points_used,
                BONUS_POINTS_PER_PURCHASE,
            )
            .await
        {
            warn!("Failed to send purchase confirmation for {}: {}", purchase.id, e);
        }

        Ok(PurchaseReceipt::from_purchase(&purchase, Some(new_balance)))
    }

    pub async fn my_purchases(&self, tourist_id: Uuid) -> Result<Vec<PurchaseReceipt>, DomainError> {
        let purchases = self.purchases.find_by_tourist(&tourist_id).await?;
        Ok(purchases
            .iter()
            .map(|p| PurchaseReceipt::from_purchase(p, None))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CartItem;
    use crate::notifications::{MockEmailService, NotificationError};
    use crate::repositories::{MockPurchaseRepository, MockTourRepository, MockUserRepository};
    use crate::services::cart_service::tests::tourist_with_points;
    use crate::services::tour_service::tests::{draft_tour, published_tour};

    struct Fixture {
        tours: MockTourRepository,
        purchases: MockPurchaseRepository,
        users: MockUserRepository,
        email: MockEmailService,
        carts: Arc<CartStore>,
    }

    impl Fixture {
        fn new(bonus_points: i32) -> Self {
            let mut users = MockUserRepository::new();
            let tourist = tourist_with_points(bonus_points);
            users
                .expect_find_tourist_by_id()
                .returning(move |_| Ok(Some(tourist.clone())));
            Self {
                tours: MockTourRepository::new(),
                purchases: MockPurchaseRepository::new(),
                users,
                email: MockEmailService::new(),
                carts: Arc::new(CartStore::new()),
            }
        }

        fn service(self) -> (PurchaseService, Arc<CartStore>) {
            let carts = self.carts.clone();
            (
                PurchaseService::new(
                    Arc::new(self.tours),
                    Arc::new(self.purchases),
                    Arc::new(self.users),
                    self.carts,
                    Arc::new(self.email),
                ),
                carts,
            )
        }
    }

    fn put_in_cart(carts: &CartStore, tourist: Uuid, tour: &crate::domain::Tour) {
        carts
            .add(tourist, CartItem { tour_id: tour.id, name: tour.name.clone(), price: tour.price })
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_cart_cannot_be_confirmed() {
        let (service, _) = Fixture::new(0).service();
        let err = service.confirm_purchase(Uuid::new_v4(), false).await.unwrap_err();
        assert_eq!(err, DomainError::CartEmpty);
    }

    #[tokio::test]
    async fn test_unknown_tourist() {
        let mut fx = Fixture::new(0);
        fx.users = MockUserRepository::new();
        fx.users.expect_find_tourist_by_id().returning(|_| Ok(None));
        let tourist = Uuid::new_v4();
        put_in_cart(&fx.carts, tourist, &published_tour(Uuid::new_v4()));

        let (service, _) = fx.service();
        let err = service.confirm_purchase(tourist, false).await.unwrap_err();
        assert_eq!(err, DomainError::TouristNotFound);
    }

    #[tokio::test]
    async fn test_unpublished_tour_blocks_checkout() {
        let mut fx = Fixture::new(0);
        let tourist = Uuid::new_v4();
        let mut tour = published_tour(Uuid::new_v4());
        put_in_cart(&fx.carts, tourist, &tour);
        tour.cancel().unwrap();
        fx.tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));
        fx.purchases.expect_save_checkout().times(0);

        let (service, carts) = fx.service();
        let err = service.confirm_purchase(tourist, false).await.unwrap_err();
        assert_eq!(err.code(), "TOUR_NOT_PUBLISHED");
        assert_eq!(err.to_string(), "Tour 'Danube Sunset' is no longer available.");
        assert_eq!(carts.items(tourist).len(), 1, "cart survives a failed checkout");
    }

    #[tokio::test]
    async fn test_bonus_is_capped_at_truncated_price() {
        let mut fx = Fixture::new(500);
        let tourist = Uuid::new_v4();
        let tour = published_tour(Uuid::new_v4());
        put_in_cart(&fx.carts, tourist, &tour);
        fx.tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));
        fx.purchases
            .expect_save_checkout()
            .withf(|p| p.bonus_points_used == 35 && p.bonus_points_earned == 10)
            .times(1)
            .returning(|_| Ok(475));
        fx.email
            .expect_send_purchase_confirmation()
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));

        let (service, carts) = fx.service();
        let receipt = service.confirm_purchase(tourist, true).await.unwrap();

        assert_eq!(receipt.original_price, Decimal::new(3550, 2));
        assert_eq!(receipt.bonus_points_used, 35);
        assert_eq!(receipt.final_price, Decimal::new(50, 2));
        assert_eq!(receipt.bonus_points_earned, BONUS_POINTS_PER_PURCHASE);
        assert_eq!(receipt.total_bonus_points, Some(475));
        assert!(carts.items(tourist).is_empty());
    }

    #[tokio::test]
    async fn test_without_bonus_full_price_is_charged() {
        let mut fx = Fixture::new(500);
        let tourist = Uuid::new_v4();
        let tour = published_tour(Uuid::new_v4());
        put_in_cart(&fx.carts, tourist, &tour);
        fx.tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));
        fx.purchases
            .expect_save_checkout()
            .withf(|p| p.bonus_points_used == 0)
            .returning(|_| Ok(510));
        fx.email.expect_send_purchase_confirmation().returning(|_, _, _, _, _| Ok(()));

        let (service, _) = fx.service();
        let receipt = service.confirm_purchase(tourist, false).await.unwrap();
        assert_eq!(receipt.final_price, receipt.original_price);
        assert!(receipt.final_price >= Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_stored_balance_wins_over_loaded_one() {
        let mut fx = Fixture::new(100);
        let tourist = Uuid::new_v4();
        let tour = published_tour(Uuid::new_v4());
        put_in_cart(&fx.carts, tourist, &tour);
        fx.tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));
        // loaded balance projects to 100 - 35 + 10 = 75, a refund landed meanwhile
        fx.purchases
            .expect_save_checkout()
            .withf(|p| p.bonus_points_used == 35 && p.bonus_points_earned == BONUS_POINTS_PER_PURCHASE)
            .times(1)
            .returning(|_| Ok(110));
        fx.email.expect_send_purchase_confirmation().returning(|_, _, _, _, _| Ok(()));

        let (service, _) = fx.service();
        let receipt = service.confirm_purchase(tourist, true).await.unwrap();
        assert_eq!(receipt.total_bonus_points, Some(110));
    }

    #[tokio::test]
    async fn test_email_failure_does_not_fail_checkout() {
        let mut fx = Fixture::new(0);
        let tourist = Uuid::new_v4();
        let tour = published_tour(Uuid::new_v4());
        put_in_cart(&fx.carts, tourist, &tour);
        fx.tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));
        fx.purchases.expect_save_checkout().returning(|_| Ok(10));
        fx.email
            .expect_send_purchase_confirmation()
            .returning(|_, _, _, _, _| Err(NotificationError::DeliveryFailed("smtp down".into())));

        let (service, _) = fx.service();
        assert!(service.confirm_purchase(tourist, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_spend_rejected_by_store_keeps_cart() {
        let mut fx = Fixture::new(50);
        let tourist = Uuid::new_v4();
        let tour = published_tour(Uuid::new_v4());
        put_in_cart(&fx.carts, tourist, &tour);
        fx.tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));
        fx.purchases.expect_save_checkout().returning(|_| {
            Err(DomainError::InsufficientBonusPoints { requested: 35, available: 0 })
        });

        let (service, carts) = fx.service();
        let err = service.confirm_purchase(tourist, true).await.unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_BONUS_POINTS");
        assert_eq!(carts.items(tourist).len(), 1);
    }

    #[tokio::test]
    async fn test_history_has_no_current_balance() {
        let mut fx = Fixture::new(0);
        let tourist = Uuid::new_v4();
        let mut purchase = Purchase::new(tourist, Decimal::from(90), 10, 10, Utc::now()).unwrap();
        purchase.add_purchased_tour(Uuid::new_v4(), "Canyon", Decimal::from(100)).unwrap();
        fx.purchases
            .expect_find_by_tourist()
            .returning(move |_| Ok(vec![purchase.clone()]));

        let (service, _) = fx.service();
        let history = service.my_purchases(tourist).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].original_price, Decimal::from(100));
        assert_eq!(history[0].final_price, Decimal::from(90));
        assert_eq!(history[0].total_bonus_points, None);
    }

    #[tokio::test]
    async fn test_draft_in_cart_reports_name() {
        let mut fx = Fixture::new(0);
        let tourist = Uuid::new_v4();
        let tour = draft_tour(Uuid::new_v4(), 2);
        put_in_cart(&fx.carts, tourist, &tour);
        fx.tours.expect_find_by_id().returning(|_| Ok(None));

        let (service, _) = fx.service();
        let err = service.confirm_purchase(tourist, false).await.unwrap_err();
        assert_eq!(err.code(), "TOUR_NOT_FOUND");
        assert_eq!(err.to_string(), "Tour 'Danube Sunset' not found.");
    }
}
