//! Canonical response shape every backend reply is normalized into

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Why the backend stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinishReason {
    /// Natural end of the reply
    Stop,
    /// Output hit the token limit
    Length,
    /// The model requested tool calls
    ToolCalls,
    /// Output was withheld by a content filter
    ContentFilter,
    /// The backend (or the orchestrator) reports a failure
    Error,
    /// Any value not covered above, kept verbatim
    Other(String),
}

impl FinishReason {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ToolCalls => "tool_calls",
            Self::ContentFilter => "content_filter",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl From<&str> for FinishReason {
    fn from(value: &str) -> Self {
        match value {
            "stop" => Self::Stop,
            "length" => Self::Length,
            "tool_calls" => Self::ToolCalls,
            "content_filter" => Self::ContentFilter,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FinishReason {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<FinishReason> for String {
    fn from(value: FinishReason) -> Self {
        value.as_str().to_string()
    }
}

impl Default for FinishReason {
    fn default() -> Self {
        Self::Stop
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token usage counters reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    /// Parsed arguments. When the backend sent text that is not a JSON
    /// object this holds `{"raw": <original text>}`.
    pub arguments: Map<String, Value>,
}

/// The single reply shape returned to callers, whatever backend served it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResponse {
    /// Text content of the reply, if any
    pub content: Option<String>,
    /// Tool calls in the order the backend returned them
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
    pub finish_reason: FinishReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Reasoning / thinking trace, for backends that expose one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
}

impl CanonicalResponse {
    /// Plain text reply finished with `stop`
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Error-shaped reply: `finish_reason = error` with diagnostic content
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: FinishReason::Error,
            ..Self::default()
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Content or the empty string
    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}
