// ============================================================================
// Tour Infrastructure - PostgreSQL Login Attempt Repository
// File: crates/tour-infrastructure/src/database/postgres/login_attempt_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tour_core::domain::LoginAttemptTracker;
use tour_core::error::DomainError;
use tour_core::repositories::LoginAttemptRepository;

use super::db_error;

pub struct PgLoginAttemptRepository {
    pool: PgPool,
}

impl PgLoginAttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TrackerRow {
    id: Uuid,
    username: String,
    failed_count: i32,
    is_blocked: bool,
    block_count: i32,
    last_failed_at: Option<DateTime<Utc>>,
    blocked_at: Option<DateTime<Utc>>,
}

impl From<TrackerRow> for LoginAttemptTracker {
    fn from(row: TrackerRow) -> Self {
        LoginAttemptTracker {
            id: row.id,
            username: row.username,
            failed_count: row.failed_count,
            is_blocked: row.is_blocked,
            block_count: row.block_count,
            last_failed_at: row.last_failed_at,
            blocked_at: row.blocked_at,
        }
    }
}

#[async_trait]
impl LoginAttemptRepository for PgLoginAttemptRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<LoginAttemptTracker>, DomainError> {
        let row: Option<TrackerRow> = sqlx::query_as(
            r#"
            SELECT id, username, failed_count, is_blocked, block_count, last_failed_at, blocked_at
            FROM login_attempt_trackers
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding login tracker"))?;

        Ok(row.map(Into::into))
    }

    async fn save(&self, tracker: &LoginAttemptTracker) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO login_attempt_trackers (
                id, username, failed_count, is_blocked, block_count, last_failed_at, blocked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (username) DO UPDATE
            SET failed_count = EXCLUDED.failed_count,
                is_blocked = EXCLUDED.is_blocked,
                block_count = EXCLUDED.block_count,
                last_failed_at = EXCLUDED.last_failed_at,
                blocked_at = EXCLUDED.blocked_at
            "#,
        )
        .bind(tracker.id)
        .bind(&tracker.username)
        .bind(tracker.failed_count)
        .bind(tracker.is_blocked)
        .bind(tracker.block_count)
        .bind(tracker.last_failed_at)
        .bind(tracker.blocked_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("saving login tracker"))?;

        Ok(())
    }

    async fn find_blocked(&self) -> Result<Vec<LoginAttemptTracker>, DomainError> {
        let rows: Vec<TrackerRow> = sqlx::query_as(
            r#"
            SELECT id, username, failed_count, is_blocked, block_count, last_failed_at, blocked_at
            FROM login_attempt_trackers
            WHERE is_blocked
            ORDER BY blocked_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("finding blocked trackers"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
