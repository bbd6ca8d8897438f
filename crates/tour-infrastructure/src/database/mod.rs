//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod postgres;
pub mod seed;

pub use connection::{create_pool, run_migrations};
pub use postgres::{
    PgLoginAttemptRepository, PgProblemRepository, PgPurchaseRepository, PgRatingRepository,
    PgTourRepository, PgUserRepository,
};
pub use seed::seed_demo_data;
