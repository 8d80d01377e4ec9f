//! Top-level relay configuration

use super::backend::BackendConfig;
use super::logging_config::LoggingConfig;
use super::timeouts::TimeoutConfig;
use crate::error::{RelayError, RelayResult};
use crate::fallback::SoftErrorPolicy;
use serde::{Deserialize, Serialize};

/// Everything needed to build an orchestrator and its HTTP transport.
///
/// `backends` is the ordered fallback chain: index 0 is the primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
    /// max_tokens used when neither the request nor the backend entry sets one
    #[serde(default = "RelayConfig::default_max_tokens")]
    pub default_max_tokens: u32,
    #[serde(default = "RelayConfig::default_temperature")]
    pub default_temperature: f32,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub soft_errors: SoftErrorPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    const fn default_max_tokens() -> u32 {
        4096
    }

    const fn default_temperature() -> f32 {
        0.7
    }

    /// Config with the given chain and defaults for everything else
    pub fn with_backends(backends: Vec<BackendConfig>) -> Self {
        Self {
            backends,
            ..Self::default()
        }
    }

    /// The primary backend, if any
    pub fn primary(&self) -> Option<&BackendConfig> {
        self.backends.first()
    }

    pub fn validate(&self) -> RelayResult<()> {
        if self.backends.is_empty() {
            return Err(RelayError::config(
                "At least one backend (the primary) must be configured",
            ));
        }
        for (index, backend) in self.backends.iter().enumerate() {
            backend
                .validate()
                .map_err(|e| e.with_context(format!("backends[{}]", index)))?;
        }
        if self.default_max_tokens == 0 {
            return Err(RelayError::config("default_max_tokens must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(RelayError::config(format!(
                "default_temperature {} is outside [0, 2]",
                self.default_temperature
            )));
        }
        self.timeouts
            .validate()
            .map_err(|e| RelayError::config_with_context(e, "timeouts"))?;
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            default_max_tokens: Self::default_max_tokens(),
            default_temperature: Self::default_temperature(),
            timeouts: TimeoutConfig::default(),
            soft_errors: SoftErrorPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}
