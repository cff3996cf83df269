//! Tracing setup shared by binaries and tests that embed the adapter.
//!
//! Library code only emits events; installing a subscriber is left to the
//! embedding program.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Builds the env filter for a logging configuration.
///
/// `RUST_LOG` wins over the configured level when it is set.
///
/// ## Errors
/// Returns `CoreError::InvalidInput` if the configured level is not a valid
/// filter directive.
pub fn env_filter(config: &LoggingConfig) -> CoreResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|err| CoreError::InvalidInput(format!("logging.level: {err}")))
}

/// ## Summary
/// Installs a global `fmt` subscriber filtered by the logging configuration.
///
/// ## Errors
/// Returns an error if the level is invalid or a global subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> CoreResult<()> {
    let filter = env_filter(config)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| CoreError::ConfigError(format!("tracing subscriber: {err}")))
}
