//! # Tour Infrastructure
//!
//! PostgreSQL repositories, schema migrations, demo data seeding, and the
//! logging email adapter.

pub mod database;
pub mod notifications;

pub use database::{
    create_pool, run_migrations, seed_demo_data, PgLoginAttemptRepository, PgProblemRepository,
    PgPurchaseRepository, PgRatingRepository, PgTourRepository, PgUserRepository,
};
pub use notifications::LogEmailService;
