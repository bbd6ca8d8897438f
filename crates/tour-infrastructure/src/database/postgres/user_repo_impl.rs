// ============================================================================
// Tour Infrastructure - PostgreSQL User Repository
// File: crates/tour-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use tour_core::domain::{Interest, SystemUser, Tourist};
use tour_core::error::DomainError;
use tour_core::repositories::UserRepository;
use tour_shared::Role;

use super::db_error;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TouristRow {
    id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    wants_recommendations: bool,
    interests: Vec<String>,
    bonus_points: i32,
    created_at: DateTime<Utc>,
}

impl From<TouristRow> for Tourist {
    fn from(row: TouristRow) -> Self {
        Tourist {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            password_hash: row.password_hash,
            wants_recommendations: row.wants_recommendations,
            interests: row.interests.iter().filter_map(|i| Interest::from_str(i)).collect(),
            bonus_points: row.bonus_points,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SystemUserRow {
    id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    role: String,
    password_hash: String,
}

impl SystemUserRow {
    fn into_user(self) -> Option<SystemUser> {
        let Some(role) = Role::from_str(&self.role).filter(|r| *r != Role::Tourist) else {
            warn!("System user {} has unusable role '{}'", self.id, self.role);
            return None;
        };
        Some(SystemUser {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
            password_hash: self.password_hash,
        })
    }
}

const TOURIST_COLUMNS: &str = r#"
    SELECT id, username, email, first_name, last_name, password_hash,
           wants_recommendations, interests, bonus_points, created_at
    FROM tourists
"#;

const SYSTEM_USER_COLUMNS: &str = r#"
    SELECT id, username, email, first_name, last_name, role, password_hash
    FROM system_users
"#;

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_tourist_by_id(&self, id: &Uuid) -> Result<Option<Tourist>, DomainError> {
        let sql = format!("{} WHERE id = $1", TOURIST_COLUMNS);
        let row: Option<TouristRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding tourist by id"))?;

        Ok(row.map(Into::into))
    }

    async fn find_tourist_by_username(&self, username: &str) -> Result<Option<Tourist>, DomainError> {
        let sql = format!("{} WHERE username = $1", TOURIST_COLUMNS);
        let row: Option<TouristRow> = sqlx::query_as(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding tourist by username"))?;

        Ok(row.map(Into::into))
    }

    async fn find_tourist_by_email(&self, email: &str) -> Result<Option<Tourist>, DomainError> {
        let sql = format!("{} WHERE LOWER(email) = LOWER($1)", TOURIST_COLUMNS);
        let row: Option<TouristRow> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding tourist by email"))?;

        Ok(row.map(Into::into))
    }

    async fn find_tourists_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tourist>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("{} WHERE id = ANY($1)", TOURIST_COLUMNS);
        let rows: Vec<TouristRow> = sqlx::query_as(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("finding tourists by ids"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_tourist(&self, tourist: &Tourist) -> Result<Tourist, DomainError> {
        let interests: Vec<String> = tourist.interests.iter().map(|i| i.as_str().to_string()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO tourists (
                id, username, email, first_name, last_name, password_hash,
                wants_recommendations, interests, bonus_points, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(tourist.id)
        .bind(&tourist.username)
        .bind(&tourist.email)
        .bind(&tourist.first_name)
        .bind(&tourist.last_name)
        .bind(&tourist.password_hash)
        .bind(tourist.wants_recommendations)
        .bind(&interests)
        .bind(tourist.bonus_points)
        .bind(tourist.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(tourist.clone()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                if e.constraint().is_some_and(|c| c.contains("email")) {
                    Err(DomainError::EmailExists)
                } else {
                    Err(DomainError::UsernameExists)
                }
            }
            Err(e) => Err(db_error("inserting tourist")(e)),
        }
    }

    async fn find_system_user_by_id(&self, id: &Uuid) -> Result<Option<SystemUser>, DomainError> {
        let sql = format!("{} WHERE id = $1", SYSTEM_USER_COLUMNS);
        let row: Option<SystemUserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding system user by id"))?;

        Ok(row.and_then(SystemUserRow::into_user))
    }

    async fn find_system_user_by_username(&self, username: &str) -> Result<Option<SystemUser>, DomainError> {
        let sql = format!("{} WHERE username = $1", SYSTEM_USER_COLUMNS);
        let row: Option<SystemUserRow> = sqlx::query_as(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding system user by username"))?;

        Ok(row.and_then(SystemUserRow::into_user))
    }
}
