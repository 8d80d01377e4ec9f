//! Loading [`RelayConfig`] from files and the environment

use super::relay_config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use config::{Config, Environment, File};
use std::path::Path;
use tracing::debug;

/// Prefix of environment variables layered over the file, e.g.
/// `RELAY__DEFAULT_MAX_TOKENS=2048`
pub const ENV_PREFIX: &str = "RELAY";

impl RelayConfig {
    /// Load and validate a config file. The format (TOML, JSON, YAML) is
    /// picked from the extension; `RELAY__*` environment variables override
    /// scalar settings from the file.
    pub fn from_file(path: impl AsRef<Path>) -> RelayResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RelayError::config_with_context(
                format!("Config file not found: {}", path.display()),
                "Loading relay configuration",
            ));
        }

        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: RelayConfig = settings.try_deserialize()?;
        config.validate()?;

        debug!(
            "Loaded relay config from {} with {} backend(s)",
            path.display(),
            config.backends.len()
        );
        Ok(config)
    }
}
