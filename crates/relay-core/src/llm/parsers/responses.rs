//! Normalize provider-shaped replies into [`CanonicalResponse`]

use crate::error::{RelayError, RelayResult};
use crate::llm::response::{CanonicalResponse, FinishReason, TokenUsage, ToolCallRequest};
use crate::llm::transport::{RawCompletion, RawToolCall, RawUsage};
use serde_json::{Map, Value};

/// Converts [`RawCompletion`]s into the canonical reply shape
pub struct ResponseParser;

impl ResponseParser {
    /// Normalize the first choice of a completion.
    ///
    /// A reply without choices is a backend failure. Everything else is
    /// lenient: a missing finish reason means `stop`, and tool arguments
    /// that are not a JSON object are wrapped as `{"raw": ...}`.
    pub fn parse(completion: RawCompletion) -> RelayResult<CanonicalResponse> {
        let RawCompletion { choices, usage, .. } = completion;
        let choice = choices
            .into_iter()
            .next()
            .ok_or_else(|| RelayError::backend("Completion contained no choices"))?;

        let message = choice.message;
        let tool_calls = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(Self::parse_tool_call)
            .collect();

        let finish_reason = choice
            .finish_reason
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(FinishReason::from)
            .unwrap_or_default();

        Ok(CanonicalResponse {
            content: message.content,
            tool_calls,
            finish_reason,
            usage: usage.map(Self::parse_usage),
            reasoning_content: message.reasoning_content.filter(|r| !r.is_empty()),
        })
    }

    fn parse_tool_call(call: RawToolCall) -> ToolCallRequest {
        ToolCallRequest {
            id: call.id,
            name: call.function.name,
            arguments: parse_tool_arguments(call.function.arguments),
        }
    }

    fn parse_usage(usage: RawUsage) -> TokenUsage {
        let total_tokens = if usage.total_tokens == 0 {
            usage.prompt_tokens.saturating_add(usage.completion_tokens)
        } else {
            usage.total_tokens
        };
        TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens,
        }
    }
}

/// Tool-call arguments as an object. Never fails: text that does not parse
/// into an object is kept as `{"raw": <text>}`.
pub fn parse_tool_arguments(arguments: Value) -> Map<String, Value> {
    match arguments {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        Value::String(text) if text.trim().is_empty() => Map::new(),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            _ => raw(Value::String(text)),
        },
        other => raw(Value::String(other.to_string())),
    }
}

fn raw(value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("raw".to_string(), value);
    map
}
