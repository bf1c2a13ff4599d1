//! Logging setup.

use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;
use crate::error::{SchedulerError, SchedulerResult};

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this twice
/// is an error because the global subscriber can only be set once.
pub fn init(config: &TelemetryConfig) -> SchedulerResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|err| {
            SchedulerError::Telemetry {
                filter: config.log_level.clone(),
                message: err.to_string(),
            }
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| SchedulerError::Telemetry {
            filter: config.log_level.clone(),
            message: err.to_string(),
        })
}
