//! PostgreSQL repository implementations

pub mod tour_repo_impl;
pub mod purchase_repo_impl;
pub mod rating_repo_impl;
pub mod problem_repo_impl;
pub mod user_repo_impl;
pub mod login_attempt_repo_impl;

pub use tour_repo_impl::PgTourRepository;
pub use purchase_repo_impl::PgPurchaseRepository;
pub use rating_repo_impl::PgRatingRepository;
pub use problem_repo_impl::PgProblemRepository;
pub use user_repo_impl::PgUserRepository;
pub use login_attempt_repo_impl::PgLoginAttemptRepository;

use tour_core::error::DomainError;
use tracing::error;

/// Logs a driver error and converts it for the service layer
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}
