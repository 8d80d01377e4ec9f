//! Transport timeout configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout configuration for backend requests
///
/// - **Connection timeout**: Time allowed to establish a connection
/// - **Request timeout**: Time allowed for a complete request/response cycle
///
/// There is deliberately no timeout above the transport: an elapsed
/// deadline is a failed attempt like any other and moves the chain on.
///
/// # Examples
///
/// ```rust
/// use relay_core::config::TimeoutConfig;
///
/// let config = TimeoutConfig::default();
/// assert_eq!(config.connection_timeout_secs, 30);
///
/// let local = TimeoutConfig::new()
///     .with_connection_timeout_secs(2)
///     .with_request_timeout_secs(600);
/// assert!(local.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in seconds. Default: 30
    #[serde(default = "TimeoutConfig::default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// End-to-end request timeout in seconds. Default: 120
    #[serde(default = "TimeoutConfig::default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl TimeoutConfig {
    const fn default_connection_timeout() -> u64 {
        30
    }

    const fn default_request_timeout() -> u64 {
        120
    }

    /// Create a new timeout configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connection timeout in seconds
    pub fn with_connection_timeout_secs(mut self, secs: u64) -> Self {
        self.connection_timeout_secs = secs;
        self
    }

    /// Set request timeout in seconds
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate timeout configuration
    ///
    /// Returns an error if any timeout is zero or the request timeout is
    /// shorter than the connection timeout.
    pub fn validate(&self) -> Result<(), String> {
        if self.connection_timeout_secs == 0 {
            return Err("Connection timeout must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        if self.request_timeout_secs < self.connection_timeout_secs {
            return Err(format!(
                "Request timeout ({}s) must be >= connection timeout ({}s)",
                self.request_timeout_secs, self.connection_timeout_secs
            ));
        }
        Ok(())
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: Self::default_connection_timeout(),
            request_timeout_secs: Self::default_request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TimeoutConfig::default();
        assert_eq!(config.connection_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(TimeoutConfig::new().with_request_timeout_secs(0).validate().is_err());
        assert!(TimeoutConfig::new().with_connection_timeout_secs(0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_request_shorter_than_connect() {
        let config = TimeoutConfig::new()
            .with_connection_timeout_secs(60)
            .with_request_timeout_secs(10);
        let err = config.validate().unwrap_err();
        assert!(err.contains("must be >="));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: TimeoutConfig =
            serde_json::from_str(r#"{"request_timeout_secs": 300}"#).unwrap();
        assert_eq!(config.connection_timeout_secs, 30);
        assert_eq!(config.request_timeout_secs, 300);
    }
}
