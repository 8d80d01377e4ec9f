//! Wire types exchanged with a [`super::ChatTransport`]

use crate::error::RelayResult;
use crate::llm::messages::{ChatMessage, ToolDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flat parameter set for one chat-completion call.
///
/// Serializes directly into an OpenAI-compatible request body; the
/// credential, base URL and headers are routing data and never part of it.
#[derive(Clone, PartialEq, Serialize)]
pub struct TransportRequest {
    /// Wire model identifier, already resolved for the target backend
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    /// Always at least 1
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Additional provider parameters added by registry overrides
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub credential: Option<String>,
    #[serde(skip)]
    pub base_url: Option<String>,
    #[serde(skip)]
    pub headers: BTreeMap<String, String>,
    /// Routing prefix of the matched backend, removed from `model` on the wire
    #[serde(skip)]
    pub routing_prefix: Option<String>,
}

impl TransportRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            tool_choice: None,
            max_tokens: max_tokens.max(1),
            temperature: None,
            extra: Map::new(),
            credential: None,
            base_url: None,
            headers: BTreeMap::new(),
            routing_prefix: None,
        }
    }

    /// Model name as the endpoint expects it, without the routing prefix
    pub fn wire_model(&self) -> &str {
        self.routing_prefix
            .as_deref()
            .and_then(|prefix| self.model.strip_prefix(prefix)?.strip_prefix('/'))
            .filter(|bare| !bare.is_empty())
            .unwrap_or(&self.model)
    }

    /// JSON request body, carrying [`Self::wire_model`] as `model`
    pub fn wire_body(&self) -> RelayResult<Value> {
        let mut body = serde_json::to_value(self)?;
        if let Some(fields) = body.as_object_mut() {
            fields.insert("model".to_string(), Value::String(self.wire_model().to_string()));
        }
        Ok(body)
    }

    /// Merge a parameter override object into this request.
    ///
    /// A `null` value drops the parameter. `model`, `messages` and `tools`
    /// are not overridable. `max_tokens` stays clamped to at least 1.
    pub fn apply_overrides(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            match key.as_str() {
                "model" | "messages" | "tools" => {}
                "max_tokens" => {
                    if let Some(n) = value.as_u64() {
                        self.max_tokens = u32::try_from(n).unwrap_or(u32::MAX).max(1);
                    }
                }
                "temperature" => {
                    self.temperature = value.as_f64().map(|t| t as f32);
                }
                "tool_choice" => {
                    self.tool_choice = value.as_str().map(str::to_string);
                }
                _ if value.is_null() => {
                    self.extra.remove(key);
                }
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

impl std::fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportRequest")
            .field("model", &self.model)
            .field("messages", &self.messages.len())
            .field("tools", &self.tools.as_ref().map(Vec::len))
            .field("tool_choice", &self.tool_choice)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("extra", &self.extra)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("routing_prefix", &self.routing_prefix)
            .finish()
    }
}

/// Provider-shaped chat-completion reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<RawChoice>,
    #[serde(default)]
    pub usage: Option<RawUsage>,
}

impl RawCompletion {
    /// Single-choice reply with text content
    pub fn from_text(content: impl Into<String>, finish_reason: impl Into<String>) -> Self {
        Self::from_message(
            RawMessage {
                content: Some(content.into()),
                ..RawMessage::default()
            },
            finish_reason,
        )
    }

    /// Single-choice reply carrying the given message
    pub fn from_message(message: RawMessage, finish_reason: impl Into<String>) -> Self {
        Self {
            choices: vec![RawChoice {
                message,
                finish_reason: Some(finish_reason.into()),
            }],
            ..Self::default()
        }
    }

    pub fn with_usage(mut self, prompt_tokens: u64, completion_tokens: u64) -> Self {
        self.usage = Some(RawUsage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChoice {
    #[serde(default)]
    pub message: RawMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<RawToolCall>>,
    #[serde(default, alias = "reasoning")]
    pub reasoning_content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawToolCall {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub function: RawFunctionCall,
}

impl RawToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            function: RawFunctionCall {
                name: name.into(),
                arguments,
            },
        }
    }
}

/// Function call payload. `arguments` is usually a JSON-encoded string but
/// some backends send an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFunctionCall {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overrides(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_new_clamps_max_tokens() {
        let request = TransportRequest::new("m", vec![], 0);
        assert_eq!(request.max_tokens, 1);
    }

    #[test]
    fn test_body_excludes_routing_fields() {
        let mut request = TransportRequest::new("gpt-4o", vec![ChatMessage::user("hi")], 64);
        request.credential = Some("sk-secret".to_string());
        request.base_url = Some("http://localhost:8000/v1".to_string());
        request.headers.insert("X-Trace".to_string(), "1".to_string());

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 64);
        assert!(body.get("credential").is_none());
        assert!(body.get("base_url").is_none());
        assert!(body.get("headers").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_wire_body_drops_routing_prefix() {
        let mut request = TransportRequest::new("hosted_vllm/local/llama", vec![], 16);
        request.routing_prefix = Some("hosted_vllm".to_string());

        assert_eq!(request.wire_model(), "local/llama");
        let body = request.wire_body().unwrap();
        assert_eq!(body["model"], "local/llama");
        assert!(body.get("routing_prefix").is_none());
    }

    #[test]
    fn test_wire_model_keeps_foreign_prefix() {
        let mut request = TransportRequest::new("openrouter/glm-4", vec![], 16);
        request.routing_prefix = Some("zai".to_string());
        assert_eq!(request.wire_model(), "openrouter/glm-4");

        request.routing_prefix = None;
        assert_eq!(request.wire_body().unwrap()["model"], "openrouter/glm-4");
    }

    #[test]
    fn test_overrides_set_and_drop() {
        let mut request = TransportRequest::new("kimi-k2.5", vec![], 100);
        request.temperature = Some(0.2);
        request.extra.insert("top_p".to_string(), json!(0.9));

        request.apply_overrides(&overrides(json!({
            "temperature": 1.0,
            "top_p": null,
            "reasoning_effort": "low",
        })));

        assert_eq!(request.temperature, Some(1.0));
        assert!(!request.extra.contains_key("top_p"));
        assert_eq!(request.extra["reasoning_effort"], "low");
    }

    #[test]
    fn test_overrides_drop_temperature() {
        let mut request = TransportRequest::new("gpt-5", vec![], 100);
        request.temperature = Some(0.7);
        request.apply_overrides(&overrides(json!({"temperature": null})));
        assert_eq!(request.temperature, None);
        assert!(serde_json::to_value(&request).unwrap().get("temperature").is_none());
    }

    #[test]
    fn test_overrides_cannot_zero_max_tokens_or_change_model() {
        let mut request = TransportRequest::new("m", vec![], 100);
        request.apply_overrides(&overrides(json!({"max_tokens": 0, "model": "other"})));
        assert_eq!(request.max_tokens, 1);
        assert_eq!(request.model, "m");
    }

    #[test]
    fn test_debug_redacts_credential() {
        let mut request = TransportRequest::new("m", vec![], 1);
        request.credential = Some("sk-very-secret".to_string());
        let debug = format!("{:?}", request);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_raw_completion_accepts_reasoning_alias() {
        let raw: RawCompletion = serde_json::from_value(json!({
            "choices": [{
                "message": {"content": "4", "reasoning": "2+2"},
                "finish_reason": "stop"
            }]
        }))
        .unwrap();
        assert_eq!(raw.choices[0].message.reasoning_content.as_deref(), Some("2+2"));
    }
}
