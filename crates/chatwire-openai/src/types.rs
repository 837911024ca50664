//! `OpenAI` Responses API request and response types.
//!
//! These types mirror `OpenAI`'s wire format and are not part of the
//! public API. Conversion to and from `chatwire` types happens in
//! [`convert`](crate::convert).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ext::ReasoningEffort;

// ── Request types ──────────────────────────────────────────────────

/// Top-level request body for `POST /v1/responses`.
#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub model: &'a str,
    pub input: Vec<InputItem<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
    pub store: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<&'a str>,
}

/// One entry of the `input` array.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum InputItem<'a> {
    /// A system, user or assistant message with plain text content.
    Message { role: &'static str, content: &'a str },
    /// A tool call previously emitted by the model.
    FunctionCall {
        call_id: &'a str,
        name: &'a str,
        /// JSON-encoded arguments.
        arguments: String,
    },
    /// The output of one tool call.
    FunctionCallOutput { call_id: &'a str, output: &'a str },
}

/// Function tool definition. Responses tools are flat, unlike Chat
/// Completions which nests them under `function`.
#[derive(Debug, Serialize)]
pub(crate) struct Tool<'a> {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub name: &'a str,
    pub description: &'a str,
    pub parameters: &'a Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct TextConfig<'a> {
    pub format: TextFormat<'a>,
}

/// Structured output constraint.
#[derive(Debug, Serialize)]
pub(crate) struct TextFormat<'a> {
    #[serde(rename = "type")]
    pub format_type: &'static str,
    pub name: &'static str,
    pub schema: &'a Value,
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct Reasoning {
    pub effort: ReasoningEffort,
    pub summary: &'static str,
}

// ── Response types ─────────────────────────────────────────────────

/// Top-level response from `POST /v1/responses`.
#[derive(Debug, Deserialize)]
pub(crate) struct Response {
    pub id: String,
    pub status: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    pub incomplete_details: Option<IncompleteDetails>,
}

/// One entry of the `output` array. Fields are populated per `type`.
#[derive(Debug, Deserialize)]
pub(crate) struct OutputItem {
    #[serde(rename = "type")]
    pub item_type: String,
    /// Content parts (for `type: "message"`).
    #[serde(default)]
    pub content: Vec<OutputContent>,
    /// Summary parts (for `type: "reasoning"`).
    #[serde(default)]
    pub summary: Vec<SummaryPart>,
    /// Call id (for `type: "function_call"`).
    pub call_id: Option<String>,
    /// Function name (for `type: "function_call"`).
    pub name: Option<String>,
    /// JSON-encoded arguments (for `type: "function_call"`).
    pub arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutputContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryPart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IncompleteDetails {
    pub reason: Option<String>,
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
    pub owned_by: Option<String>,
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
