// ============================================================================
// Tour Infrastructure - PostgreSQL Tour Repository
// File: crates/tour-infrastructure/src/database/postgres/tour_repo_impl.rs
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};
use uuid::Uuid;

use tour_core::domain::{BonusRefund, Difficulty, Interest, KeyPoint, Tour, TourStatus, TourVersion};
use tour_core::error::DomainError;
use tour_core::repositories::TourRepository;

use super::db_error;

const TOUR_COLUMNS: &str = r#"
    SELECT id, guide_id, name, description, difficulty, category, price,
           start_date, status, needs_replacement, replacement_requested_at, created_at
    FROM tours
"#;

pub struct PgTourRepository {
    pool: PgPool,
}

impl PgTourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads key points for all rows in one query and assembles the tours
    async fn with_key_points(&self, rows: Vec<TourRow>) -> Result<Vec<Tour>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let points: Vec<KeyPointRow> = sqlx::query_as(
            r#"
            SELECT id, tour_id, latitude, longitude, name, description, image_url, sort_order
            FROM key_points
            WHERE tour_id = ANY($1)
            ORDER BY tour_id, sort_order
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("loading key points"))?;

        let mut by_tour: HashMap<Uuid, Vec<KeyPoint>> = HashMap::new();
        for point in points {
            by_tour.entry(point.tour_id).or_default().push(point.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let key_points = by_tour.remove(&row.id).unwrap_or_default();
                row.into_tour(key_points)
            })
            .collect())
    }

    async fn fetch_tours(&self, rows: Result<Vec<TourRow>, sqlx::Error>, context: &'static str) -> Result<Vec<Tour>, DomainError> {
        let rows = rows.map_err(db_error(context))?;
        self.with_key_points(rows).await
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct TourRow {
    id: Uuid,
    guide_id: Uuid,
    name: String,
    description: String,
    difficulty: String,
    category: String,
    price: Decimal,
    start_date: DateTime<Utc>,
    status: String,
    needs_replacement: bool,
    replacement_requested_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TourRow {
    fn into_tour(self, key_points: Vec<KeyPoint>) -> Tour {
        let status = TourStatus::from_str(&self.status).unwrap_or_else(|| {
            warn!("Unknown tour status '{}' on tour {}", self.status, self.id);
            TourStatus::default()
        });

        Tour {
            id: self.id,
            guide_id: self.guide_id,
            name: self.name,
            description: self.description,
            difficulty: Difficulty::from_str(&self.difficulty).unwrap_or_default(),
            category: Interest::from_str(&self.category).unwrap_or_default(),
            price: self.price,
            start_date: self.start_date,
            status,
            key_points,
            needs_replacement: self.needs_replacement,
            replacement_requested_at: self.replacement_requested_at,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct KeyPointRow {
    id: Uuid,
    tour_id: Uuid,
    latitude: f64,
    longitude: f64,
    name: String,
    description: String,
    image_url: String,
    sort_order: i32,
}

impl From<KeyPointRow> for KeyPoint {
    fn from(row: KeyPointRow) -> Self {
        KeyPoint {
            id: row.id,
            tour_id: row.tour_id,
            latitude: row.latitude,
            longitude: row.longitude,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            order: row.sort_order,
        }
    }
}

#[async_trait]
impl TourRepository for PgTourRepository {
    async fn create(&self, tour: &Tour) -> Result<Tour, DomainError> {
        let mut transaction = self.pool.begin().await.map_err(db_error("starting tour insert"))?;

        sqlx::query(
            r#"
            INSERT INTO tours (
                id, guide_id, name, description, difficulty, category, price,
                start_date, status, needs_replacement, replacement_requested_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(tour.id)
        .bind(tour.guide_id)
        .bind(&tour.name)
        .bind(&tour.description)
        .bind(tour.difficulty.as_str())
        .bind(tour.category.as_str())
        .bind(tour.price)
        .bind(tour.start_date)
        .bind(tour.status.as_str())
        .bind(tour.needs_replacement)
        .bind(tour.replacement_requested_at)
        .bind(tour.created_at)
        .execute(&mut *transaction)
        .await
        .map_err(db_error("inserting tour"))?;

        for point in &tour.key_points {
            insert_key_point(&mut transaction, point).await?;
        }

        transaction.commit().await.map_err(db_error("committing tour insert"))?;
        debug!("Inserted tour {}", tour.id);
        Ok(tour.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Tour>, DomainError> {
        let sql = format!("{} WHERE id = $1", TOUR_COLUMNS);
        let row: Option<TourRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding tour by id"))?;

        match row {
            Some(row) => Ok(self.with_key_points(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_guide(&self, guide_id: &Uuid, ascending: bool) -> Result<Vec<Tour>, DomainError> {
        let sql = format!(
            "{} WHERE guide_id = $1 ORDER BY start_date {}",
            TOUR_COLUMNS,
            direction(ascending)
        );
        let rows = sqlx::query_as(&sql).bind(guide_id).fetch_all(&self.pool).await;
        self.fetch_tours(rows, "finding tours by guide").await
    }

    async fn find_published(&self, ascending: bool) -> Result<Vec<Tour>, DomainError> {
        let sql = format!(
            "{} WHERE status = 'Published' ORDER BY start_date {}",
            TOUR_COLUMNS,
            direction(ascending)
        );
        let rows = sqlx::query_as(&sql).fetch_all(&self.pool).await;
        self.fetch_tours(rows, "finding published tours").await
    }

    async fn add_key_point(&self, key_point: &KeyPoint) -> Result<KeyPoint, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO key_points (id, tour_id, latitude, longitude, name, description, image_url, sort_order)
            SELECT $1, t.id, $3, $4, $5, $6, $7, $8
            FROM tours t
            WHERE t.id = $2 AND t.status = 'Draft'
            FOR SHARE
            "#,
        )
        .bind(key_point.id)
        .bind(key_point.tour_id)
        .bind(key_point.latitude)
        .bind(key_point.longitude)
        .bind(&key_point.name)
        .bind(&key_point.description)
        .bind(&key_point.image_url)
        .bind(key_point.order)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                warn!("Key point rejected, tour {} is no longer a draft", key_point.tour_id);
                Err(DomainError::invalid_operation("Key points can only be added to draft tours."))
            }
            Ok(_) => Ok(key_point.clone()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                warn!("Key point order {} already taken on tour {}", key_point.order, key_point.tour_id);
                Err(DomainError::changed_concurrently("Tour"))
            }
            Err(e) => Err(db_error("inserting key point")(e)),
        }
    }

    async fn update(&self, tour: &Tour, expected: &TourVersion) -> Result<Option<Tour>, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tours
            SET guide_id = $2, name = $3, description = $4, price = $5, start_date = $6,
                status = $7, needs_replacement = $8, replacement_requested_at = $9
            WHERE id = $1 AND guide_id = $10 AND status = $11 AND needs_replacement = $12
            "#,
        )
        .bind(tour.id)
        .bind(tour.guide_id)
        .bind(&tour.name)
        .bind(&tour.description)
        .bind(tour.price)
        .bind(tour.start_date)
        .bind(tour.status.as_str())
        .bind(tour.needs_replacement)
        .bind(tour.replacement_requested_at)
        .bind(expected.guide_id)
        .bind(expected.status.as_str())
        .bind(expected.needs_replacement)
        .execute(&self.pool)
        .await
        .map_err(db_error("updating tour"))?;

        if result.rows_affected() == 0 {
            debug!("Tour {} changed since it was loaded, update skipped", tour.id);
            return Ok(None);
        }
        Ok(Some(tour.clone()))
    }

    async fn find_needing_replacement(
        &self,
        exclude_guide_id: &Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Tour>, DomainError> {
        let sql = format!(
            "{} WHERE status = 'Published' AND needs_replacement AND guide_id <> $1 AND start_date > $2 \
             ORDER BY start_date ASC",
            TOUR_COLUMNS
        );
        let rows = sqlx::query_as(&sql)
            .bind(exclude_guide_id)
            .bind(now)
            .fetch_all(&self.pool)
            .await;
        self.fetch_tours(rows, "finding tours needing replacement").await
    }

    async fn find_unreplaced_starting_between(
        &self,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Tour>, DomainError> {
        let sql = format!(
            "{} WHERE status = 'Published' AND needs_replacement AND start_date > $1 AND start_date <= $2 \
             ORDER BY start_date ASC",
            TOUR_COLUMNS
        );
        let rows = sqlx::query_as(&sql).bind(after).bind(until).fetch_all(&self.pool).await;
        self.fetch_tours(rows, "finding unreplaced tours").await
    }

    async fn find_for_reminder(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Tour>, DomainError> {
        let sql = format!(
            "{} WHERE status = 'Published' AND NOT needs_replacement AND reminder_sent_at IS NULL \
             AND start_date BETWEEN $1 AND $2 ORDER BY start_date ASC",
            TOUR_COLUMNS
        );
        let rows = sqlx::query_as(&sql).bind(from).bind(to).fetch_all(&self.pool).await;
        self.fetch_tours(rows, "finding tours for reminder").await
    }

    async fn has_published_tour_between(
        &self,
        guide_id: &Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM tours
                WHERE guide_id = $1 AND status = 'Published'
                  AND start_date >= $2 AND start_date < $3
            )
            "#,
        )
        .bind(guide_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("checking guide schedule"))?;

        Ok(exists)
    }

    async fn claim_reminder(&self, tour_id: &Uuid, at: DateTime<Utc>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE tours SET reminder_sent_at = $2 WHERE id = $1 AND reminder_sent_at IS NULL",
        )
        .bind(tour_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_error("claiming tour reminder"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn save_cancellation(&self, tour: &Tour, refunds: &[BonusRefund]) -> Result<bool, DomainError> {
        let mut transaction = self.pool.begin().await.map_err(db_error("starting cancellation"))?;

        let result = sqlx::query(
            r#"
            UPDATE tours
            SET status = $2, needs_replacement = $3, replacement_requested_at = $4
            WHERE id = $1 AND status = 'Published' AND needs_replacement
            "#,
        )
        .bind(tour.id)
        .bind(tour.status.as_str())
        .bind(tour.needs_replacement)
        .bind(tour.replacement_requested_at)
        .execute(&mut *transaction)
        .await
        .map_err(db_error("canceling tour"))?;

        if result.rows_affected() == 0 {
            transaction.rollback().await.map_err(db_error("rolling back cancellation"))?;
            return Ok(false);
        }

        for refund in refunds {
            sqlx::query("UPDATE tourists SET bonus_points = bonus_points + $2 WHERE id = $1")
                .bind(refund.tourist_id)
                .bind(refund.points)
                .execute(&mut *transaction)
                .await
                .map_err(db_error("crediting refund"))?;
        }

        transaction.commit().await.map_err(db_error("committing cancellation"))?;
        Ok(true)
    }
}

fn direction(ascending: bool) -> &'static str {
    if ascending {
        "ASC"
    } else {
        "DESC"
    }
}

async fn insert_key_point(conn: &mut sqlx::PgConnection, point: &KeyPoint) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO key_points (id, tour_id, latitude, longitude, name, description, image_url, sort_order)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(point.id)
    .bind(point.tour_id)
    .bind(point.latitude)
    .bind(point.longitude)
    .bind(&point.name)
    .bind(&point.description)
    .bind(&point.image_url)
    .bind(point.order)
    .execute(conn)
    .await
    .map_err(db_error("inserting key point"))?;

    Ok(())
}
