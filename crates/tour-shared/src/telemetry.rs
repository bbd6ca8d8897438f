//! Telemetry setup
//!
//! `RUST_LOG` selects the filter, `LOG_FORMAT=json` switches stdout to JSON,
//! and a non-empty `LOG_DIR` adds a daily-rolling JSON file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::{DEFAULT_LOG_FILTER, LOG_FILE_PREFIX};
use crate::error::AppError;

/// The returned guard must be held for the lifetime of the process when file logging is on.
pub fn init_telemetry() -> Result<Option<WorkerGuard>, AppError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .map_err(|e| AppError::TelemetryError(e.to_string()))?;

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    let stdout_layer = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer().pretty().with_target(true).boxed()
    };

    let (file_layer, guard) = match std::env::var("LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .build(dir.trim())
                .map_err(|e| AppError::TelemetryError(e.to_string()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::TelemetryError(e.to_string()))?;

    Ok(guard)
}
