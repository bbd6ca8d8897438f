// ============================================================================
// Tour Infrastructure - PostgreSQL Purchase Repository
// File: crates/tour-infrastructure/src/database/postgres/purchase_repo_impl.rs
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use tour_core::domain::{Purchase, PurchasedTour};
use tour_core::error::DomainError;
use tour_core::repositories::PurchaseRepository;

use super::db_error;

pub struct PgPurchaseRepository {
    pool: PgPool,
}

impl PgPurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PurchaseRow {
    id: Uuid,
    tourist_id: Uuid,
    purchased_at: DateTime<Utc>,
    total_price: Decimal,
    bonus_points_used: i32,
    bonus_points_earned: i32,
}

#[derive(Debug, FromRow)]
struct PurchasedTourRow {
    id: Uuid,
    purchase_id: Uuid,
    tour_id: Uuid,
    tour_name: String,
    price_at_purchase: Decimal,
}

impl From<PurchasedTourRow> for PurchasedTour {
    fn from(row: PurchasedTourRow) -> Self {
        PurchasedTour {
            id: row.id,
            purchase_id: row.purchase_id,
            tour_id: row.tour_id,
            tour_name: row.tour_name,
            price_at_purchase: row.price_at_purchase,
        }
    }
}

#[async_trait]
impl PurchaseRepository for PgPurchaseRepository {
    async fn save_checkout(&self, purchase: &Purchase) -> Result<i32, DomainError> {
        let mut transaction = self.pool.begin().await.map_err(db_error("starting checkout"))?;

        // Guarded update: concurrent checkouts cannot drive the balance negative
        let new_balance: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE tourists
            SET bonus_points = bonus_points - $2 + $3
            WHERE id = $1 AND bonus_points >= $2
            RETURNING bonus_points
            "#,
        )
        .bind(purchase.tourist_id)
        .bind(purchase.bonus_points_used)
        .bind(purchase.bonus_points_earned)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(db_error("updating bonus balance"))?;

        let Some(new_balance) = new_balance else {
            let available: Option<i32> =
                sqlx::query_scalar("SELECT bonus_points FROM tourists WHERE id = $1")
                    .bind(purchase.tourist_id)
                    .fetch_optional(&mut *transaction)
                    .await
                    .map_err(db_error("reading bonus balance"))?;

            return Err(match available {
                Some(available) => {
                    warn!(
                        "Checkout for tourist {} needs {} points, balance is {}",
                        purchase.tourist_id, purchase.bonus_points_used, available
                    );
                    DomainError::InsufficientBonusPoints {
                        requested: purchase.bonus_points_used,
                        available,
                    }
                }
                None => DomainError::TouristNotFound,
            });
        };

        sqlx::query(
            r#"
            INSERT INTO purchases (id, tourist_id, purchased_at, total_price, bonus_points_used, bonus_points_earned)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(purchase.id)
        .bind(purchase.tourist_id)
        .bind(purchase.purchased_at)
        .bind(purchase.total_price)
        .bind(purchase.bonus_points_used)
        .bind(purchase.bonus_points_earned)
        .execute(&mut *transaction)
        .await
        .map_err(db_error("inserting purchase"))?;

        for line in &purchase.purchased_tours {
            sqlx::query(
                r#"
                INSERT INTO purchased_tours (id, purchase_id, tour_id, tour_name, price_at_purchase)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(line.id)
            .bind(line.purchase_id)
            .bind(line.tour_id)
            .bind(&line.tour_name)
            .bind(line.price_at_purchase)
            .execute(&mut *transaction)
            .await
            .map_err(db_error("inserting purchased tour"))?;
        }

        transaction.commit().await.map_err(db_error("committing checkout"))?;
        info!(
            "Purchase {} stored: {} tours, balance now {}",
            purchase.id,
            purchase.purchased_tours.len(),
            new_balance
        );
        Ok(new_balance)
    }

    async fn find_by_tourist(&self, tourist_id: &Uuid) -> Result<Vec<Purchase>, DomainError> {
        let rows: Vec<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, tourist_id, purchased_at, total_price, bonus_points_used, bonus_points_earned
            FROM purchases
            WHERE tourist_id = $1
            ORDER BY purchased_at DESC
            "#,
        )
        .bind(tourist_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("finding purchases by tourist"))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let lines: Vec<PurchasedTourRow> = sqlx::query_as(
            r#"
            SELECT id, purchase_id, tour_id, tour_name, price_at_purchase
            FROM purchased_tours
            WHERE purchase_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("loading purchased tours"))?;

        let mut by_purchase: HashMap<Uuid, Vec<PurchasedTour>> = HashMap::new();
        for line in lines {
            by_purchase.entry(line.purchase_id).or_default().push(line.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| Purchase {
                purchased_tours: by_purchase.remove(&row.id).unwrap_or_default(),
                id: row.id,
                tourist_id: row.tourist_id,
                purchased_at: row.purchased_at,
                total_price: row.total_price,
                bonus_points_used: row.bonus_points_used,
                bonus_points_earned: row.bonus_points_earned,
            })
            .collect())
    }

    async fn has_purchased(&self, tourist_id: &Uuid, tour_id: &Uuid) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM purchased_tours pt
                JOIN purchases p ON p.id = pt.purchase_id
                WHERE p.tourist_id = $1 AND pt.tour_id = $2
            )
            "#,
        )
        .bind(tourist_id)
        .bind(tour_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("checking purchase"))?;

        Ok(exists)
    }

    async fn find_buyer_ids(&self, tour_id: &Uuid) -> Result<Vec<Uuid>, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT DISTINCT p.tourist_id
            FROM purchased_tours pt
            JOIN purchases p ON p.id = pt.purchase_id
            WHERE pt.tour_id = $1
            "#,
        )
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("finding buyers"))
    }
}
