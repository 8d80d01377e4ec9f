//! Chat message and tool definition types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (instructions)
    System,
    /// User message (human input)
    User,
    /// Assistant message (model output)
    Assistant,
    /// Tool message (tool execution result)
    Tool,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

/// A message in the chat conversation, in OpenAI-compatible wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message. Assistant messages that only carry tool
    /// calls have no content.
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls issued by an assistant message, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<Value>>,
    /// Tool call this message answers (tool messages only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Optional name (for tool messages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    fn with_role(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::System, content)
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, content)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }

    /// Create a new tool result message
    pub fn tool(
        content: impl Into<String>,
        tool_call_id: impl Into<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            name,
            ..Self::with_role(MessageRole::Tool, content)
        }
    }
}

/// Function description inside a tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema of the function parameters
    #[serde(default = "empty_object")]
    pub parameters: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// A tool the model may call, in OpenAI function-calling shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

fn function_type() -> String {
    "function".to_string()
}

impl ToolDefinition {
    /// Create a function tool definition
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            kind: function_type(),
            function: FunctionDefinition {
                name: name.into(),
                description: Some(description.into()),
                parameters,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_without_empty_fields() {
        let value = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_tool_message_carries_call_id() {
        let msg = ChatMessage::tool("42", "call_1", Some("calc".to_string()));
        assert_eq!(msg.role, MessageRole::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(msg.name.as_deref(), Some("calc"));
    }

    #[test]
    fn test_tool_definition_wire_shape() {
        let tool = ToolDefinition::function(
            "get_weather",
            "Look up the weather",
            json!({"type": "object", "properties": {"city": {"type": "string"}}}),
        );
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "get_weather");
    }

    #[test]
    fn test_tool_definition_defaults_when_deserializing() {
        let tool: ToolDefinition =
            serde_json::from_value(json!({"function": {"name": "noop"}})).unwrap();
        assert_eq!(tool.kind, "function");
        assert_eq!(tool.function.parameters, json!({}));
    }
}
