//! Conversation value types: messages, tool calls, tool results, turns.
//!
//! These are plain data. The ordered `Vec<Message>` inside a
//! [`Chat`](crate::Chat) is the literal history every adapter encodes;
//! nothing here is provider-specific.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LlmError;

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// Text written by the user.
    User {
        /// The user's text.
        text: String,
    },
    /// A model reply, possibly requesting tool calls.
    Assistant {
        /// Reply text. Empty when the model only called tools.
        text: String,
        /// Tool calls in the order the model emitted them.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// The output of one tool call, fed back to the model.
    Tool(ToolResult),
}

impl Message {
    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    /// Creates an assistant message without tool calls.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Returns `true` for [`Message::Tool`].
    pub fn is_tool_result(&self) -> bool {
        matches!(self, Self::Tool(_))
    }
}

/// A tool the model may call.
///
/// `parameters` is a JSON Schema the adapters forward verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name the model uses to call the tool.
    pub name: String,
    /// What the tool does, shown to the model.
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Creates a definition from its three parts.
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool invocation requested by the model.
///
/// Only produced by decoding. The `id` is the provider's, or an
/// order-based id synthesized by the adapter when the provider sends none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call identifier, stable for one round trip.
    pub id: String,
    /// Name of the tool to run.
    pub name: String,
    /// Arguments as an untyped JSON value.
    pub arguments: Value,
}

/// The output of one executed [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The [`ToolCall::id`] this answers.
    pub id: String,
    /// The tool's name. Some providers key results by name instead of id.
    pub name: String,
    /// JSON-serialized output.
    pub output: String,
}

impl ToolResult {
    /// Creates a result for `call` by serializing `output`.
    pub fn for_call(call: &ToolCall, output: &impl Serialize) -> Result<Self, LlmError> {
        Ok(Self {
            id: call.id.clone(),
            name: call.name.clone(),
            output: serde_json::to_string(output)?,
        })
    }
}

/// The outcome of one provider exchange.
///
/// `X` is the adapter's extension value, updated by decode (for example
/// with a continuation id or the model's reasoning summary).
#[derive(Debug, Clone, PartialEq)]
pub struct Turn<X> {
    /// Concatenated text output.
    pub text: String,
    /// Tool calls in emission order.
    pub tool_calls: Vec<ToolCall>,
    /// Raw provider stop reason, if the response carried one.
    pub stop_reason: Option<String>,
    /// Updated provider extension value.
    pub ext: X,
}

impl<X> Turn<X> {
    /// Returns `true` if the model requested at least one tool call.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Parses the turn text as JSON into `T`.
    ///
    /// Meant for chats in JSON output mode, where the provider constrains
    /// the text to the requested schema.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, LlmError> {
        serde_json::from_str(&self.text)
            .map_err(|e| LlmError::Decode(format!("turn text is not the expected JSON: {e}")))
    }
}

/// A model descriptor returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Identifier to pass when creating a chat.
    pub id: String,
    /// Human-readable name, when the provider supplies one.
    pub display_name: Option<String>,
    /// Owning organization, when the provider supplies one.
    pub owned_by: Option<String>,
    /// On-disk size in bytes (local providers).
    pub size: Option<u64>,
}
