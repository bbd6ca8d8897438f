// ============================================================================
// Tour Core - Auth Service
// File: crates/tour-core/src/services/auth_service.rs
// Description: Tourist self-registration and login with account lockout
// ============================================================================

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use tour_security::{JwtService, PasswordService};
use tour_shared::utils::{is_blank, mask_email};
use tour_shared::Role;

use crate::domain::{Interest, LoginAttemptTracker, Tourist};
use crate::error::DomainError;
use crate::repositories::{LoginAttemptRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct RegisterTouristInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub interests: Vec<Interest>,
    pub wants_recommendations: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub token: String,
    pub role: Role,
    pub username: String,
}

/// Identity resolved from either user table
struct Credentials {
    id: Uuid,
    username: String,
    role: Role,
    password_hash: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    attempts: Arc<dyn LoginAttemptRepository>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        attempts: Arc<dyn LoginAttemptRepository>,
        jwt: JwtService,
    ) -> Self {
        Self { users, attempts, jwt }
    }

    pub async fn register_tourist(&self, input: RegisterTouristInput) -> Result<AuthResult, DomainError> {
        let username = input.username.trim();

        if self.users.find_tourist_by_username(username).await?.is_some()
            || self.users.find_system_user_by_username(username).await?.is_some()
        {
            return Err(DomainError::UsernameExists);
        }

        if self.users.find_tourist_by_email(input.email.trim()).await?.is_some() {
            return Err(DomainError::EmailExists);
        }

        if is_blank(&input.password) {
            return Err(DomainError::validation("Password cannot be empty."));
        }

        let password_hash = PasswordService::hash(&input.password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        let tourist = Tourist::new(
            username,
            &input.email,
            &input.first_name,
            &input.last_name,
            password_hash,
            input.wants_recommendations,
            input.interests,
        )?;

        let created = self.users.create_tourist(&tourist).await?;
        info!(
            "Tourist registered: {} ({})",
            created.username,
            mask_email(&created.email)
        );

        self.issue(created.id, &created.username, Role::Tourist)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResult, DomainError> {
        let username = username.trim();
        let tracker = self.attempts.find_by_username(username).await?;

        if let Some(tracker) = tracker.as_ref().filter(|t| t.is_blocked) {
            warn!("Login attempt on locked account: {}", username);
            return Err(DomainError::AccountLocked(format!(
                "Account is locked due to too many failed login attempts. Block count: {}",
                tracker.block_count
            )));
        }

        let credentials = self.find_credentials(username).await?;

        let verified = match &credentials {
            Some(c) => PasswordService::verify(password, &c.password_hash)
                .map_err(|e| DomainError::PasswordHashError(e.to_string()))?,
            None => false,
        };

        let Some(credentials) = credentials.filter(|_| verified) else {
            return Err(self.record_failure(username, tracker).await?);
        };

        if let Some(mut tracker) = tracker {
            if tracker.failed_count > 0 {
                tracker.reset_failed_attempts();
                self.attempts.save(&tracker).await?;
            }
        }

        info!("User logged in: {} as {}", credentials.username, credentials.role);
        self.issue(credentials.id, &credentials.username, credentials.role)
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, DomainError> {
        if let Some(tourist) = self.users.find_tourist_by_username(username).await? {
            return Ok(Some(Credentials {
                id: tourist.id,
                username: tourist.username,
                role: Role::Tourist,
                password_hash: tourist.password_hash,
            }));
        }

        Ok(self
            .users
            .find_system_user_by_username(username)
            .await?
            .map(|user| Credentials {
                id: user.id,
                username: user.username,
                role: user.role,
                password_hash: user.password_hash,
            }))
    }

    /// Counts the failure and returns the error the caller should see
    async fn record_failure(
        &self,
        username: &str,
        tracker: Option<LoginAttemptTracker>,
    ) -> Result<DomainError, DomainError> {
        let mut tracker = match tracker {
            Some(tracker) => tracker,
            None => LoginAttemptTracker::new(username)?,
        };

        let locked = tracker.record_failed_attempt(Utc::now());
        self.attempts.save(&tracker).await?;

        if locked {
            warn!(
                "Account locked after {} failed attempts: {} (block count {})",
                tracker.failed_count, username, tracker.block_count
            );
            return Ok(DomainError::AccountLocked(
                "Account has been locked due to too many failed login attempts.".to_string(),
            ));
        }

        warn!("Failed login for {} ({} consecutive)", username, tracker.failed_count);
        Ok(DomainError::InvalidCredentials)
    }

    fn issue(&self, user_id: Uuid, username: &str, role: Role) -> Result<AuthResult, DomainError> {
        let token = self
            .jwt
            .generate_access_token(&user_id, username, role)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        Ok(AuthResult {
            token,
            role,
            username: username.to_string(),
        })
    }
}
