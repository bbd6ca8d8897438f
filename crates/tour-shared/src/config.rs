//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_ACCESS_TOKEN_EXPIRY, DEFAULT_CORS_ORIGIN, DEFAULT_JOB_INTERVAL_SECONDS,
    DEFAULT_JWT_AUDIENCE, DEFAULT_JWT_ISSUER,
};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub jobs: JobSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub cors_origin: String,
    /// Insert the demo accounts on startup when the user tables are empty
    pub seed_demo_data: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JobSettings {
    pub enabled: bool,
    pub interval_seconds: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::builder(&env)?.build()?.try_deserialize()
    }

    fn builder(
        env: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("app.env", env)?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "tour-server")?
            .set_default("app.cors_origin", DEFAULT_CORS_ORIGIN)?
            .set_default("app.seed_demo_data", false)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_seconds", 3)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.issuer", DEFAULT_JWT_ISSUER)?
            .set_default("jwt.audience", DEFAULT_JWT_AUDIENCE)?
            .set_default("jwt.access_token_expiry", DEFAULT_ACCESS_TOKEN_EXPIRY)?
            .set_default("jobs.enabled", true)?
            .set_default("jobs.interval_seconds", DEFAULT_JOB_INTERVAL_SECONDS)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true)))
    }
}
