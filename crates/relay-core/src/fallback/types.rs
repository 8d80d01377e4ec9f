//! Type definitions for the fallback chain

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, RelayResult};
use crate::llm::messages::{ChatMessage, ToolDefinition};
use crate::llm::response::CanonicalResponse;

/// Text some backends put at the start of an error reply instead of failing
pub const DEFAULT_ERROR_SENTINEL: &str = "Error calling LLM:";

/// How replies that encode a failure are recognized.
///
/// `finish_reason = error` is always a soft error. Matching the sentinel
/// prefix can misclassify a legitimate reply that happens to start with it,
/// so it can be switched off once every backend sets the finish reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftErrorPolicy {
    #[serde(default = "SoftErrorPolicy::default_detect_sentinel")]
    pub detect_sentinel: bool,
    #[serde(default = "SoftErrorPolicy::default_sentinel")]
    pub sentinel: String,
}

impl SoftErrorPolicy {
    fn default_detect_sentinel() -> bool {
        true
    }

    fn default_sentinel() -> String {
        DEFAULT_ERROR_SENTINEL.to_string()
    }

    /// Only the machine-readable finish reason counts
    pub fn finish_reason_only() -> Self {
        Self {
            detect_sentinel: false,
            ..Self::default()
        }
    }

    pub fn is_soft_error(&self, response: &CanonicalResponse) -> bool {
        if response.finish_reason.is_error() {
            return true;
        }
        self.detect_sentinel
            && !self.sentinel.is_empty()
            && response
                .content_str()
                .trim_start()
                .starts_with(&self.sentinel)
    }
}

impl Default for SoftErrorPolicy {
    fn default() -> Self {
        Self {
            detect_sentinel: Self::default_detect_sentinel(),
            sentinel: Self::default_sentinel(),
        }
    }
}

/// One inbound chat call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Option<Vec<ToolDefinition>>,
    /// Overrides the primary backend's model; fallbacks keep their own
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
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

    /// A request must carry at least one message
    pub fn validate(&self) -> RelayResult<()> {
        if self.messages.is_empty() {
            return Err(RelayError::invalid_input_field(
                "Chat request has no messages",
                "messages",
            ));
        }
        Ok(())
    }
}

/// How a backend attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The invocation returned an error
    Hard,
    /// The backend replied, but the reply reports a failure
    Soft,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hard => write!(f, "hard"),
            Self::Soft => write!(f, "soft"),
        }
    }
}

/// A recorded per-backend failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSummary {
    pub index: usize,
    pub label: String,
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for FailureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.message)
    }
}

/// What happened during a chat call
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackEventKind {
    /// A backend failed and the next one will be tried
    AttemptFailed {
        failure: FailureSummary,
        next: String,
    },
    /// A fallback backend succeeded after earlier ones failed
    Recovered { index: usize, label: String },
    /// Every backend failed
    Exhausted { failures: Vec<FailureSummary> },
}

/// Record of a fallback event
#[derive(Debug, Clone)]
pub struct FallbackEvent {
    pub kind: FallbackEventKind,
    pub timestamp: Instant,
}

impl FallbackEvent {
    pub fn new(kind: FallbackEventKind) -> Self {
        Self {
            kind,
            timestamp: Instant::now(),
        }
    }

    pub fn is_recovery(&self) -> bool {
        matches!(self.kind, FallbackEventKind::Recovered { .. })
    }
}

/// Human-readable name of chain slot `index`
pub fn slot_label(index: usize, backend: &str, model: &str) -> String {
    if index == 0 {
        format!("Primary ({}/{})", backend, model)
    } else {
        format!("Fallback {} ({}/{})", index, backend, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_soft_error_by_finish_reason() {
        let policy = SoftErrorPolicy::finish_reason_only();
        assert!(policy.is_soft_error(&CanonicalResponse::error("anything")));
        assert!(!policy.is_soft_error(&CanonicalResponse::text("Error calling LLM: x")));
    }

    #[test]
    fn test_soft_error_by_sentinel() {
        let policy = SoftErrorPolicy::default();
        assert!(policy.is_soft_error(&CanonicalResponse::text("Error calling LLM: 429")));
        assert!(!policy.is_soft_error(&CanonicalResponse::text("All good. Error calling LLM:")));
        assert!(!policy.is_soft_error(&CanonicalResponse::default()));
    }

    #[test]
    fn test_soft_error_sentinel_after_leading_whitespace() {
        let policy = SoftErrorPolicy::default();
        let reply = CanonicalResponse::text("\n  Error calling LLM: upstream 500");
        assert!(policy.is_soft_error(&reply));
        assert!(!SoftErrorPolicy::finish_reason_only()
            .is_soft_error(&CanonicalResponse::text("  Error calling LLM: upstream 500")));
    }

    #[test]
    fn test_request_without_messages_is_invalid() {
        let err = ChatRequest::default().validate().unwrap_err();
        assert!(matches!(
            err,
            RelayError::InvalidInput { field: Some(ref f), .. } if f == "messages"
        ));
        assert!(ChatRequest::new(vec![ChatMessage::user("hi")]).validate().is_ok());
    }

    #[test]
    fn test_policy_deserialize_defaults() {
        let policy: SoftErrorPolicy = serde_json::from_value(json!({})).unwrap();
        assert_eq!(policy, SoftErrorPolicy::default());

        let policy: SoftErrorPolicy =
            serde_json::from_value(json!({"sentinel": "ERR:"})).unwrap();
        assert!(policy.detect_sentinel);
        assert_eq!(policy.sentinel, "ERR:");
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(slot_label(0, "vllm", "local/llama"), "Primary (vllm/local/llama)");
        assert_eq!(
            slot_label(2, "openrouter", "anthropic/claude"),
            "Fallback 2 (openrouter/anthropic/claude)"
        );
    }

    #[test]
    fn test_chat_request_builder() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")])
            .with_model("gpt-4o")
            .with_max_tokens(0)
            .with_temperature(0.2);
        assert_eq!(request.model.as_deref(), Some("gpt-4o"));
        assert_eq!(request.max_tokens, Some(0));
        assert!(request.tools.is_none());
    }
}
