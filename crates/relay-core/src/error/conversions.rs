//! From trait implementations for RelayError conversions

use super::types::RelayError;

impl From<std::io::Error> for RelayError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::timeout(error.to_string());
        }
        if error.is_decode() {
            return Self::json(format!("Failed to decode backend reply: {}", error));
        }
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
            context: None,
        }
    }
}

impl From<config::ConfigError> for RelayError {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_context(error.to_string(), "Loading relay configuration")
    }
}
