//! In-memory per-tourist carts
//!
//! Carts live only in process memory and are lost on restart. All mutation for
//! one tourist happens under that tourist's map entry lock.

use dashmap::DashMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::CartItem;
use crate::error::DomainError;

#[derive(Debug, Default)]
pub struct CartStore {
    carts: DashMap<Uuid, Vec<CartItem>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, tourist_id: Uuid, item: CartItem) -> Result<(), DomainError> {
        let mut cart = self.carts.entry(tourist_id).or_default();
        if cart.iter().any(|i| i.tour_id == item.tour_id) {
            return Err(DomainError::TourAlreadyInCart);
        }
        cart.push(item);
        Ok(())
    }

    pub fn remove(&self, tourist_id: Uuid, tour_id: Uuid) -> Result<(), DomainError> {
        let now_empty = {
            let mut cart = match self.carts.get_mut(&tourist_id) {
                Some(cart) if !cart.is_empty() => cart,
                _ => return Err(DomainError::CartEmpty),
            };
            let before = cart.len();
            cart.retain(|i| i.tour_id != tour_id);
            if cart.len() == before {
                return Err(DomainError::TourNotInCart);
            }
            cart.is_empty()
        };

        if now_empty {
            self.carts.remove_if(&tourist_id, |_, items| items.is_empty());
        }
        Ok(())
    }

    /// Snapshot of the cart, empty when the tourist has none
    pub fn items(&self, tourist_id: Uuid) -> Vec<CartItem> {
        self.carts
            .get(&tourist_id)
            .map(|cart| cart.value().clone())
            .unwrap_or_default()
    }

    pub fn clear(&self, tourist_id: Uuid) {
        self.carts.remove(&tourist_id);
    }

    pub fn total(items: &[CartItem]) -> Decimal {
        items.iter().map(|i| i.price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn item(price: i64) -> CartItem {
        CartItem {
            tour_id: Uuid::new_v4(),
            name: format!("Tour {}", price),
            price: Decimal::from(price),
        }
    }

    #[test]
    fn test_add_and_total() {
        let store = CartStore::new();
        let tourist = Uuid::new_v4();
        store.add(tourist, item(30)).unwrap();
        store.add(tourist, item(12)).unwrap();

        let items = store.items(tourist);
        assert_eq!(items.len(), 2);
        assert_eq!(CartStore::total(&items), Decimal::from(42));
    }

    #[test]
    fn test_duplicate_tour_is_rejected() {
        let store = CartStore::new();
        let tourist = Uuid::new_v4();
        let line = item(10);
        store.add(tourist, line.clone()).unwrap();
        assert_eq!(store.add(tourist, line).unwrap_err(), DomainError::TourAlreadyInCart);
        assert_eq!(store.items(tourist).len(), 1);
    }

    #[test]
    fn test_remove_errors() {
        let store = CartStore::new();
        let tourist = Uuid::new_v4();
        assert_eq!(store.remove(tourist, Uuid::new_v4()).unwrap_err(), DomainError::CartEmpty);

        let line = item(10);
        store.add(tourist, line.clone()).unwrap();
        assert_eq!(store.remove(tourist, Uuid::new_v4()).unwrap_err(), DomainError::TourNotInCart);

        store.remove(tourist, line.tour_id).unwrap();
        assert!(store.items(tourist).is_empty());
        assert_eq!(store.remove(tourist, line.tour_id).unwrap_err(), DomainError::CartEmpty);
    }

    #[test]
    fn test_carts_are_per_tourist() {
        let store = CartStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.add(a, item(1)).unwrap();
        assert!(store.items(b).is_empty());
        store.clear(a);
        assert!(store.items(a).is_empty());
    }

    #[test]
    fn test_concurrent_adds_of_same_tour_keep_one() {
        let store = Arc::new(CartStore::new());
        let tourist = Uuid::new_v4();
        let line = item(5);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let line = line.clone();
                std::thread::spawn(move || store.add(tourist, line).is_ok())
            })
            .collect();
        let successes = handles.into_iter().filter_map(|h| h.join().ok()).filter(|ok| *ok).count();

        assert_eq!(successes, 1);
        assert_eq!(store.items(tourist).len(), 1);
    }
}
