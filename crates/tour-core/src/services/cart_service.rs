// ============================================================================
// Tour Core - Cart Service
// File: crates/tour-core/src/services/cart_service.rs
// ============================================================================
//! Tourist shopping cart over the in-memory [`CartStore`]

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::cart::CartStore;
use crate::domain::{applicable_bonus_points, CartItem, TourStatus};
use crate::error::DomainError;
use crate::repositories::{TourRepository, UserRepository};

/// Cart contents plus what the tourist could redeem at checkout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_price: Decimal,
    pub available_bonus_points: i32,
    pub max_bonus_discount: i32,
}

pub struct CartService {
    tours: Arc<dyn TourRepository>,
    users: Arc<dyn UserRepository>,
    carts: Arc<CartStore>,
}

impl CartService {
    pub fn new(
        tours: Arc<dyn TourRepository>,
        users: Arc<dyn UserRepository>,
        carts: Arc<CartStore>,
    ) -> Self {
        Self { tours, users, carts }
    }

    pub async fn add_to_cart(&self, tourist_id: Uuid, tour_id: Uuid) -> Result<CartView, DomainError> {
        let tour = self
            .tours
            .find_by_id(&tour_id)
            .await?
            .ok_or(DomainError::TourNotFound)?;

        if tour.status != TourStatus::Published {
            return Err(DomainError::TourNotPublished(
                "Only published tours can be added to cart.".to_string(),
            ));
        }

        self.carts.add(
            tourist_id,
            CartItem {
                tour_id: tour.id,
                name: tour.name.clone(),
                price: tour.price,
            },
        )?;
        debug!("Tour {} added to cart of tourist {}", tour_id, tourist_id);

        self.get_cart(tourist_id).await
    }

    pub async fn remove_from_cart(&self, tourist_id: Uuid, tour_id: Uuid) -> Result<CartView, DomainError> {
        self.carts.remove(tourist_id, tour_id)?;
        debug!("Tour {} removed from cart of tourist {}", tour_id, tourist_id);

        self.get_cart(tourist_id).await
    }

    pub async fn get_cart(&self, tourist_id: Uuid) -> Result<CartView, DomainError> {
        let items = self.carts.items(tourist_id);
        let bonus_points = self
            .users
            .find_tourist_by_id(&tourist_id)
            .await?
            .map(|t| t.bonus_points)
            .unwrap_or(0);

        let total_price = CartStore::total(&items);
        Ok(CartView {
            max_bonus_discount: applicable_bonus_points(bonus_points, total_price),
            items,
            total_price,
            available_bonus_points: bonus_points,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{Interest, Tourist};
    use crate::repositories::{MockTourRepository, MockUserRepository};
    use crate::services::tour_service::tests::{draft_tour, published_tour};

    pub(crate) fn tourist_with_points(points: i32) -> Tourist {
        let mut tourist = Tourist::new(
            "jane_smith",
            "jane@example.com",
            "Jane",
            "Smith",
            "$argon2id$stub".into(),
            false,
            vec![Interest::Art],
        )
        .unwrap();
        tourist.add_bonus_points(points).unwrap();
        tourist
    }

    fn users_with_points(points: i32) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        let tourist = tourist_with_points(points);
        users
            .expect_find_tourist_by_id()
            .returning(move |_| Ok(Some(tourist.clone())));
        users
    }

    #[tokio::test]
    async fn test_add_published_tour_snapshots_price() {
        let tour = published_tour(Uuid::new_v4());
        let (tour_id, price) = (tour.id, tour.price);

        let mut tours = MockTourRepository::new();
        tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));

        let service = CartService::new(Arc::new(tours), Arc::new(users_with_points(100)), Arc::new(CartStore::new()));
        let cart = service.add_to_cart(Uuid::new_v4(), tour_id).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].price, price);
        assert_eq!(cart.total_price, price);
        assert_eq!(cart.available_bonus_points, 100);
        // 35.50 truncates to 35
        assert_eq!(cart.max_bonus_discount, 35);
    }

    #[tokio::test]
    async fn test_add_draft_tour_is_rejected() {
        let tour = draft_tour(Uuid::new_v4(), 2);
        let tour_id = tour.id;

        let mut tours = MockTourRepository::new();
        tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));

        let service = CartService::new(Arc::new(tours), Arc::new(MockUserRepository::new()), Arc::new(CartStore::new()));
        let err = service.add_to_cart(Uuid::new_v4(), tour_id).await.unwrap_err();
        assert_eq!(err.code(), "TOUR_NOT_PUBLISHED");
    }

    #[tokio::test]
    async fn test_add_twice_is_rejected() {
        let tour = published_tour(Uuid::new_v4());
        let tour_id = tour.id;

        let mut tours = MockTourRepository::new();
        tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));

        let service = CartService::new(Arc::new(tours), Arc::new(users_with_points(0)), Arc::new(CartStore::new()));
        let tourist = Uuid::new_v4();
        service.add_to_cart(tourist, tour_id).await.unwrap();
        let err = service.add_to_cart(tourist, tour_id).await.unwrap_err();
        assert_eq!(err, DomainError::TourAlreadyInCart);
    }

    #[tokio::test]
    async fn test_add_missing_tour() {
        let mut tours = MockTourRepository::new();
        tours.expect_find_by_id().returning(|_| Ok(None));

        let service = CartService::new(Arc::new(tours), Arc::new(MockUserRepository::new()), Arc::new(CartStore::new()));
        let err = service.add_to_cart(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err, DomainError::TourNotFound);
    }

    #[tokio::test]
    async fn test_remove_from_empty_cart() {
        let service = CartService::new(
            Arc::new(MockTourRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(CartStore::new()),
        );
        let err = service.remove_from_cart(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err, DomainError::CartEmpty);
    }

    #[tokio::test]
    async fn test_empty_cart_for_unknown_tourist() {
        let mut users = MockUserRepository::new();
        users.expect_find_tourist_by_id().returning(|_| Ok(None));

        let service = CartService::new(Arc::new(MockTourRepository::new()), Arc::new(users), Arc::new(CartStore::new()));
        let cart = service.get_cart(Uuid::new_v4()).await.unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_price, Decimal::ZERO);
        assert_eq!(cart.available_bonus_points, 0);
        assert_eq!(cart.max_bonus_discount, 0);
    }
}
