//! Logging initialization.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::container::LoggingConfig;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log filter {:?}", config.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    if config.json {
        builder
            .json()
            .with_thread_ids(true)
            .try_init()
            .map_err(|e| anyhow!("Failed to install JSON subscriber: {}", e))?;
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow!("Failed to install subscriber: {}", e))?;
    }
    Ok(())
}
