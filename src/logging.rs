//! Logging setup.

use tracing_subscriber::EnvFilter;
use verdict_core::{EngineConfig, Result, VerdictError};

/// Installs a `tracing` fmt subscriber.
///
/// `RUST_LOG` wins when it is set; otherwise the config's `log_filter`
/// applies.
///
/// # Errors
/// Returns a configuration error if the filter is invalid or a global
/// subscriber is already installed.
pub fn init(config: &EngineConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| VerdictError::config(format!("invalid log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| VerdictError::config(format!("failed to install subscriber: {e}")))?;

    tracing::debug!(filter = %config.log_filter, "logging initialized");
    Ok(())
}
