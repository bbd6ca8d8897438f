// ============================================================================
// Tour Infrastructure - PostgreSQL Rating Repository
// File: crates/tour-infrastructure/src/database/postgres/rating_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tour_core::domain::Rating;
use tour_core::error::DomainError;
use tour_core::repositories::RatingRepository;

use super::db_error;

pub struct PgRatingRepository {
    pool: PgPool,
}

impl PgRatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RatingRow {
    id: Uuid,
    tourist_id: Uuid,
    tour_id: Uuid,
    score: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Rating {
            id: row.id,
            tourist_id: row.tourist_id,
            tour_id: row.tour_id,
            score: row.score,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl RatingRepository for PgRatingRepository {
    async fn create(&self, rating: &Rating) -> Result<Rating, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO ratings (id, tourist_id, tour_id, score, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(rating.id)
        .bind(rating.tourist_id)
        .bind(rating.tour_id)
        .bind(rating.score)
        .bind(&rating.comment)
        .bind(rating.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(rating.clone()),
            // A concurrent duplicate hits the (tourist_id, tour_id) unique key
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DomainError::AlreadyRated),
            Err(e) => Err(db_error("inserting rating")(e)),
        }
    }

    async fn find_by_tourist_and_tour(
        &self,
        tourist_id: &Uuid,
        tour_id: &Uuid,
    ) -> Result<Option<Rating>, DomainError> {
        let row: Option<RatingRow> = sqlx::query_as(
            r#"
            SELECT id, tourist_id, tour_id, score, comment, created_at
            FROM ratings
            WHERE tourist_id = $1 AND tour_id = $2
            "#,
        )
        .bind(tourist_id)
        .bind(tour_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding rating"))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_tour(&self, tour_id: &Uuid) -> Result<Vec<Rating>, DomainError> {
        let rows: Vec<RatingRow> = sqlx::query_as(
            r#"
            SELECT id, tourist_id, tour_id, score, comment, created_at
            FROM ratings
            WHERE tour_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("finding ratings by tour"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn average_for_tour(&self, tour_id: &Uuid) -> Result<Option<f64>, DomainError> {
        sqlx::query_scalar("SELECT AVG(score)::FLOAT8 FROM ratings WHERE tour_id = $1")
            .bind(tour_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("averaging ratings"))
    }
}
