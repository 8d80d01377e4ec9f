//! One entry of the fallback chain

use crate::error::{RelayError, RelayResult};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration of one backend endpoint in the fallback chain.
///
/// Immutable once handed to the orchestrator. Field aliases accept the
/// `provider_name` / `api_key` / `api_base` spelling used by older config
/// files.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend label, also used for gateway detection (e.g. "openrouter", "vllm")
    #[serde(alias = "provider_name")]
    pub backend_name: String,
    /// Model identifier as the caller knows it
    pub model: String,
    #[serde(default, alias = "api_key")]
    pub credential: Option<String>,
    #[serde(default, alias = "api_base")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
    /// Per-entry override of the request's max_tokens
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Per-entry override of the request's temperature, in [0, 2]
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl BackendConfig {
    pub fn new(backend_name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            backend_name: backend_name.into(),
            model: model.into(),
            credential: None,
            base_url: None,
            extra_headers: BTreeMap::new(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The configured credential, ignoring empty strings
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref().filter(|c| !c.is_empty())
    }

    /// The configured base URL, ignoring empty strings
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|u| !u.is_empty())
    }

    pub fn validate(&self) -> RelayResult<()> {
        if self.backend_name.trim().is_empty() {
            return Err(RelayError::config("Backend name must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(RelayError::config(format!(
                "Backend '{}' has an empty model",
                self.backend_name
            )));
        }
        if self.max_tokens == Some(0) {
            return Err(RelayError::config(format!(
                "Backend '{}': max_tokens must be greater than 0",
                self.backend_name
            )));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(RelayError::config(format!(
                    "Backend '{}': temperature {} is outside [0, 2]",
                    self.backend_name, t
                )));
            }
        }
        for (name, value) in &self.extra_headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err()
                || HeaderValue::from_str(value).is_err()
            {
                return Err(RelayError::config(format!(
                    "Backend '{}': invalid header '{}'",
                    self.backend_name, name
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("backend_name", &self.backend_name)
            .field("model", &self.model)
            .field("credential", &self.credential().map(mask_credential))
            .field("base_url", &self.base_url)
            .field("extra_headers", &self.extra_headers.keys().collect::<Vec<_>>())
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Display-safe form of a credential: first and last four characters
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = BackendConfig::new("vllm", "local/llama")
            .with_base_url("http://x")
            .with_header("X-Team", "infra")
            .with_max_tokens(1024)
            .with_temperature(0.2);

        assert_eq!(config.base_url(), Some("http://x"));
        assert_eq!(config.credential(), None);
        assert_eq!(config.max_tokens, Some(1024));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let config = BackendConfig::new("openai", "gpt-4o")
            .with_credential("")
            .with_base_url("");
        assert_eq!(config.credential(), None);
        assert_eq!(config.base_url(), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(BackendConfig::new("", "m").validate().is_err());
        assert!(BackendConfig::new("b", " ").validate().is_err());
        assert!(BackendConfig::new("b", "m").with_max_tokens(0).validate().is_err());
        assert!(BackendConfig::new("b", "m").with_temperature(2.5).validate().is_err());
        assert!(BackendConfig::new("b", "m").with_temperature(-0.1).validate().is_err());
        assert!(
            BackendConfig::new("b", "m")
                .with_header("bad header", "v")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_legacy_field_aliases() {
        let config: BackendConfig = serde_json::from_str(
            r#"{"provider_name": "openrouter", "model": "anthropic/claude", "api_key": "sk-or-1", "api_base": "https://openrouter.ai/api/v1"}"#,
        )
        .unwrap();
        assert_eq!(config.backend_name, "openrouter");
        assert_eq!(config.credential(), Some("sk-or-1"));
        assert_eq!(config.base_url(), Some("https://openrouter.ai/api/v1"));
    }

    #[test]
    fn test_debug_masks_credential() {
        let config = BackendConfig::new("openai", "gpt-4o").with_credential("sk-1234567890abcdef");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-1234567890abcdef"));
        assert!(debug.contains("sk-1...cdef"));
    }

    #[test]
    fn test_mask_short_credential() {
        assert_eq!(mask_credential("abc"), "***");
    }
}
