//! Anthropic Messages API request and response types.
//!
//! These types mirror Anthropic's wire format and are not part of the
//! public API. Conversion to and from `chatwire` types happens in
//! [`convert`](crate::convert).

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Request types ──────────────────────────────────────────────────

/// Top-level request body for `POST /v1/messages`.
#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    pub messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat<'a>>,
}

/// A single message in the conversation.
#[derive(Debug, Serialize)]
pub(crate) struct Message<'a> {
    pub role: &'static str,
    pub content: Vec<ContentBlock<'a>>,
}

/// A content block within a message.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum ContentBlock<'a> {
    /// Plain text content.
    #[serde(rename = "text")]
    Text { text: &'a str },
    /// Replayed thinking (sent in assistant messages).
    #[serde(rename = "thinking")]
    Thinking {
        thinking: &'a str,
        signature: &'a str,
    },
    /// Replayed encrypted thinking.
    #[serde(rename = "redacted_thinking")]
    RedactedThinking { data: &'a str },
    /// A tool invocation (sent in assistant messages).
    #[serde(rename = "tool_use")]
    ToolUse {
        id: &'a str,
        name: &'a str,
        input: &'a Value,
    },
    /// A tool result (sent in user messages).
    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: &'a str,
        content: &'a str,
    },
}

/// Tool definition sent in the request.
#[derive(Debug, Serialize)]
pub(crate) struct Tool<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub input_schema: &'a Value,
}

/// Extended thinking configuration.
#[derive(Debug, Serialize)]
pub(crate) struct ThinkingConfig {
    #[serde(rename = "type")]
    pub thinking_type: &'static str,
    pub budget_tokens: u32,
}

/// Structured output constraint (beta).
#[derive(Debug, Serialize)]
pub(crate) struct OutputFormat<'a> {
    #[serde(rename = "type")]
    pub format_type: &'static str,
    pub schema: &'a Value,
}

// ── Response types ─────────────────────────────────────────────────

/// Top-level response from `POST /v1/messages`.
#[derive(Debug, Deserialize)]
pub(crate) struct Response {
    #[serde(default)]
    pub content: Vec<ResponseContent>,
    pub stop_reason: Option<String>,
}

/// A content block in the response.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseContent {
    #[serde(rename = "type")]
    pub content_type: String,
    /// Text content (for `type: "text"`).
    pub text: Option<String>,
    /// Thinking content (for `type: "thinking"`).
    pub thinking: Option<String>,
    /// Thinking signature (for `type: "thinking"`).
    pub signature: Option<String>,
    /// Encrypted payload (for `type: "redacted_thinking"`).
    pub data: Option<String>,
    /// Tool use ID (for `type: "tool_use"`).
    pub id: Option<String>,
    /// Tool name (for `type: "tool_use"`).
    pub name: Option<String>,
    /// Tool input JSON (for `type: "tool_use"`).
    pub input: Option<Value>,
}

/// Response from `GET /v1/models`.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    pub id: String,
    pub display_name: Option<String>,
}

// ── Error types ────────────────────────────────────────────────────

/// Error response body from the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail within an error response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}
