// ============================================================================
// Tour Infrastructure - PostgreSQL Problem Repository
// File: crates/tour-infrastructure/src/database/postgres/problem_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};
use uuid::Uuid;

use tour_core::domain::{Problem, ProblemStatus, ProblemStatusChangedEvent};
use tour_core::error::DomainError;
use tour_core::repositories::ProblemRepository;
use tour_shared::Role;

use super::db_error;

pub struct PgProblemRepository {
    pool: PgPool,
}

impl PgProblemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_status(value: &str) -> ProblemStatus {
    ProblemStatus::from_str(value).unwrap_or_else(|| {
        warn!("Unknown problem status '{}'", value);
        ProblemStatus::default()
    })
}

#[derive(Debug, FromRow)]
struct ProblemRow {
    id: Uuid,
    tourist_id: Uuid,
    tour_id: Uuid,
    title: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<ProblemRow> for Problem {
    fn from(row: ProblemRow) -> Self {
        Problem {
            id: row.id,
            tourist_id: row.tourist_id,
            tour_id: row.tour_id,
            title: row.title,
            description: row.description,
            status: parse_status(&row.status),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProblemEventRow {
    id: Uuid,
    problem_id: Uuid,
    old_status: String,
    new_status: String,
    changed_at: DateTime<Utc>,
    changed_by_role: String,
    changed_by_user_id: Uuid,
}

impl From<ProblemEventRow> for ProblemStatusChangedEvent {
    fn from(row: ProblemEventRow) -> Self {
        ProblemStatusChangedEvent {
            id: row.id,
            problem_id: row.problem_id,
            old_status: parse_status(&row.old_status),
            new_status: parse_status(&row.new_status),
            changed_at: row.changed_at,
            changed_by_role: Role::from_str(&row.changed_by_role).unwrap_or(Role::Admin),
            changed_by_user_id: row.changed_by_user_id,
        }
    }
}

#[async_trait]
impl ProblemRepository for PgProblemRepository {
    async fn create(&self, problem: &Problem) -> Result<Problem, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO problems (id, tourist_id, tour_id, title, description, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(problem.id)
        .bind(problem.tourist_id)
        .bind(problem.tour_id)
        .bind(&problem.title)
        .bind(&problem.description)
        .bind(problem.status.as_str())
        .bind(problem.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("inserting problem"))?;

        Ok(problem.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Problem>, DomainError> {
        let row: Option<ProblemRow> = sqlx::query_as(
            r#"
            SELECT id, tourist_id, tour_id, title, description, status, created_at
            FROM problems
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding problem by id"))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_tour(&self, tour_id: &Uuid) -> Result<Vec<Problem>, DomainError> {
        let rows: Vec<ProblemRow> = sqlx::query_as(
            r#"
            SELECT id, tourist_id, tour_id, title, description, status, created_at
            FROM problems
            WHERE tour_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("finding problems by tour"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_status(&self, status: ProblemStatus) -> Result<Vec<Problem>, DomainError> {
        let rows: Vec<ProblemRow> = sqlx::query_as(
            r#"
            SELECT id, tourist_id, tour_id, title, description, status, created_at
            FROM problems
            WHERE status = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("finding problems by status"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save_transition(
        &self,
        problem: &Problem,
        event: &ProblemStatusChangedEvent,
    ) -> Result<bool, DomainError> {
        let mut transaction = self.pool.begin().await.map_err(db_error("starting transition"))?;

        let result = sqlx::query("UPDATE problems SET status = $2 WHERE id = $1 AND status = $3")
            .bind(problem.id)
            .bind(problem.status.as_str())
            .bind(event.old_status.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(db_error("updating problem status"))?;

        if result.rows_affected() == 0 {
            transaction.rollback().await.map_err(db_error("rolling back transition"))?;
            debug!("Problem {} left {} before the transition was saved", problem.id, event.old_status.as_str());
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO problem_events (
                id, problem_id, old_status, new_status, changed_at, changed_by_role, changed_by_user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.id)
        .bind(event.problem_id)
        .bind(event.old_status.as_str())
        .bind(event.new_status.as_str())
        .bind(event.changed_at)
        .bind(event.changed_by_role.as_str())
        .bind(event.changed_by_user_id)
        .execute(&mut *transaction)
        .await
        .map_err(db_error("inserting problem event"))?;

        transaction.commit().await.map_err(db_error("committing transition"))?;
        Ok(true)
    }

    async fn find_events(&self, problem_id: &Uuid) -> Result<Vec<ProblemStatusChangedEvent>, DomainError> {
        let rows: Vec<ProblemEventRow> = sqlx::query_as(
            r#"
            SELECT id, problem_id, old_status, new_status, changed_at, changed_by_role, changed_by_user_id
            FROM problem_events
            WHERE problem_id = $1
            ORDER BY changed_at ASC
            "#,
        )
        .bind(problem_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("finding problem events"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
