//! Application-wide constants

pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 86400;
pub const DEFAULT_JWT_ISSUER: &str = "tour-booking";
pub const DEFAULT_JWT_AUDIENCE: &str = "tour-booking-clients";
pub const DEFAULT_LOG_FILTER: &str = "info,tour_server=debug,tour_core=debug,tour_api=debug";
pub const DEFAULT_JOB_INTERVAL_SECONDS: u64 = 3600;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";
pub const LOG_FILE_PREFIX: &str = "tour-server";
