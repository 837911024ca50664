//! Conversion between `chatwire` types and `OpenAI` Responses API types.
//!
//! Every history entry maps to its own `input` item: tool calls become
//! `function_call` items and each tool result a separate
//! `function_call_output` item.

use chatwire::conversation::{OutputFormat, ToolState};
use chatwire::{Chat, LlmError, Message, ModelInfo, ToolCall, Turn};
use serde_json::{Map, Value};
use tracing::warn;

use crate::ext::OpenAiExt;
use crate::types::{
    ErrorResponse, InputItem, ModelsResponse, OutputItem, Reasoning, Request, Response,
    TextConfig, TextFormat, Tool,
};

// ── Request conversion ───────────────────────────────────────────────

/// Build a Responses API request body from a chat.
pub(crate) fn build_request<S, T: ToolState, F: OutputFormat>(
    chat: &Chat<OpenAiExt, S, T, F>,
) -> Request<'_> {
    let ext = chat.ext();
    let previous_response_id = ext.previous_response_id.as_deref();

    Request {
        model: chat.model(),
        input: convert_input(chat.system_prompt(), chat.messages(), previous_response_id.is_some()),
        tools: chat
            .tools()
            .iter()
            .map(|t| Tool {
                tool_type: "function",
                name: &t.name,
                description: &t.description,
                parameters: &t.parameters,
            })
            .collect(),
        temperature: chat.temperature_setting(),
        max_output_tokens: chat.max_tokens_setting(),
        text: chat.output_schema().map(|schema| TextConfig {
            format: TextFormat {
                format_type: "json_schema",
                name: "output",
                schema,
                strict: true,
            },
        }),
        reasoning: ext.reasoning_effort.map(|effort| Reasoning {
            effort,
            summary: "auto",
        }),
        store: ext.store,
        previous_response_id,
    }
}

/// Convert the system prompt and history to `input` items.
///
/// When continuing a stored response the server already holds everything
/// up to and including the last assistant message, so only later entries
/// are sent and the system prompt is skipped.
fn convert_input<'a>(
    system: Option<&'a str>,
    messages: &'a [Message],
    continuing: bool,
) -> Vec<InputItem<'a>> {
    let (system, messages) = if continuing {
        let start = messages
            .iter()
            .rposition(|m| matches!(m, Message::Assistant { .. }))
            .map_or(0, |i| i + 1);
        (None, &messages[start..])
    } else {
        (system, messages)
    };

    let mut items = Vec::with_capacity(messages.len() + 1);
    if let Some(system) = system {
        items.push(InputItem::Message {
            role: "system",
            content: system,
        });
    }
    for message in messages {
        match message {
            Message::User { text } => items.push(InputItem::Message {
                role: "user",
                content: text,
            }),
            Message::Assistant { text, tool_calls } => {
                if !text.is_empty() {
                    items.push(InputItem::Message {
                        role: "assistant",
                        content: text,
                    });
                }
                items.extend(tool_calls.iter().map(|call| InputItem::FunctionCall {
                    call_id: &call.id,
                    name: &call.name,
                    arguments: call.arguments.to_string(),
                }));
            }
            Message::Tool(result) => items.push(InputItem::FunctionCallOutput {
                call_id: &result.id,
                output: &result.output,
            }),
        }
    }
    items
}

// ── Response conversion ──────────────────────────────────────────────

/// Convert a Responses API response into a turn.
///
/// `output_text` parts are concatenated in order across message items.
/// Reasoning summaries go to [`OpenAiExt::reasoning_summary`]. When
/// storage is on, the response id becomes the next
/// `previous_response_id`.
pub(crate) fn convert_response(
    response: Response,
    ext: &OpenAiExt,
) -> Result<Turn<OpenAiExt>, LlmError> {
    let mut text = String::new();
    let mut summaries: Vec<String> = Vec::new();
    let mut tool_calls = Vec::new();

    for item in response.output {
        match item.item_type.as_str() {
            "message" => {
                for part in item.content {
                    match part.content_type.as_str() {
                        "output_text" => text.push_str(part.text.as_deref().unwrap_or_default()),
                        other => warn!(content_type = other, "ignoring openai message content"),
                    }
                }
            }
            "reasoning" => summaries.extend(item.summary.into_iter().filter_map(|s| s.text)),
            "function_call" => tool_calls.push(convert_function_call(item)?),
            other => warn!(item_type = other, "ignoring unknown openai output item"),
        }
    }

    let stop_reason = response
        .incomplete_details
        .and_then(|d| d.reason)
        .or(response.status);

    Ok(Turn {
        text,
        tool_calls,
        stop_reason,
        ext: OpenAiExt {
            previous_response_id: ext.store.then_some(response.id),
            reasoning_summary: (!summaries.is_empty()).then(|| summaries.join("\n\n")),
            ..ext.clone()
        },
    })
}

/// Arguments arrive as a JSON-encoded string and need a second parse.
fn convert_function_call(item: OutputItem) -> Result<ToolCall, LlmError> {
    let id = item
        .call_id
        .ok_or_else(|| LlmError::Decode("openai function_call missing call_id".into()))?;
    let name = item
        .name
        .ok_or_else(|| LlmError::Decode("openai function_call missing name".into()))?;
    let raw = item.arguments.unwrap_or_default();
    let arguments = if raw.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str(&raw).map_err(|e| {
            LlmError::Decode(format!(
                "openai function_call arguments for {name} are not valid JSON: {e}"
            ))
        })?
    };
    Ok(ToolCall {
        id,
        name,
        arguments,
    })
}

/// Extract the message from an `OpenAI` error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Convert a `GET /v1/models` response.
pub(crate) fn convert_models(response: ModelsResponse) -> Vec<ModelInfo> {
    response
        .data
        .into_iter()
        .map(|m| ModelInfo {
            id: m.id,
            display_name: None,
            owned_by: m.owned_by,
            size: None,
        })
        .collect()
}
