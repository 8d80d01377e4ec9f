//! Tracing subscriber setup

use anyhow::anyhow;
use relay_core::config::{LogFormat, LoggingConfig};
use relay_core::RelayConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Logging settings from the config file, or defaults when it is missing
/// or unreadable. Errors surface later when the command loads it.
pub fn load_settings(config_file: &str) -> LoggingConfig {
    if !Path::new(config_file).exists() {
        return LoggingConfig::default();
    }
    RelayConfig::from_file(config_file)
        .map(|c| c.logging)
        .unwrap_or_default()
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
    let default_directive = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
