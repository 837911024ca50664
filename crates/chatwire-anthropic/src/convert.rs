//! Conversion between `chatwire` types and Anthropic API types.
//!
//! Consecutive tool results collapse into a single user message holding
//! one `tool_result` block per result, which is the shape the Messages API
//! expects after an assistant turn with several `tool_use` blocks.

use chatwire::conversation::{OutputFormat as OutputState, ToolState};
use chatwire::{Chat, LlmError, Message as ChatMessage, ModelInfo, ToolCall, Turn};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::AnthropicConfig;
use crate::ext::{AnthropicExt, ThinkingBlock};
use crate::types::{
    ContentBlock, ErrorResponse, Message, ModelsResponse, OutputFormat, Request, Response,
    ThinkingConfig, Tool,
};

/// Beta flag enabling `output_format`.
pub(crate) const STRUCTURED_OUTPUTS_BETA: &str = "structured-outputs-2025-11-13";
/// Beta flag enabling thinking between tool calls.
pub(crate) const INTERLEAVED_THINKING_BETA: &str = "interleaved-thinking-2025-05-14";

// ── Request conversion ───────────────────────────────────────────────

/// Build an Anthropic API request body from a chat and provider config.
///
/// Without interleaved thinking the API needs `budget_tokens < max_tokens`;
/// a budget that does not fit is a configuration error.
pub(crate) fn build_request<'a, S, T: ToolState, F: OutputState>(
    chat: &'a Chat<AnthropicExt, S, T, F>,
    config: &AnthropicConfig,
) -> Result<Request<'a>, LlmError> {
    let ext = chat.ext();
    let max_tokens = chat.max_tokens_setting().unwrap_or(config.max_tokens);
    if let Some(budget) = ext.thinking_budget {
        if !ext.interleaved_thinking && budget >= max_tokens {
            return Err(LlmError::config(
                crate::PROVIDER,
                format!("thinking budget ({budget}) must be below max_tokens ({max_tokens})"),
            ));
        }
    }

    Ok(Request {
        model: chat.model(),
        max_tokens,
        system: chat.system_prompt(),
        messages: convert_messages(chat.messages(), &ext.thinking_blocks),
        temperature: chat.temperature_setting(),
        tools: chat
            .tools()
            .iter()
            .map(|t| Tool {
                name: &t.name,
                description: &t.description,
                input_schema: &t.parameters,
            })
            .collect(),
        thinking: ext.thinking_budget.map(|budget| ThinkingConfig {
            thinking_type: "enabled",
            budget_tokens: budget,
        }),
        output_format: chat.output_schema().map(|schema| OutputFormat {
            format_type: "json_schema",
            schema,
        }),
    })
}

/// Value for the `anthropic-beta` header, if any beta feature is in use.
pub(crate) fn beta_header(ext: &AnthropicExt, json_output: bool) -> Option<String> {
    let mut flags = Vec::new();
    if json_output {
        flags.push(STRUCTURED_OUTPUTS_BETA);
    }
    if ext.interleaved_thinking {
        flags.push(INTERLEAVED_THINKING_BETA);
    }
    (!flags.is_empty()).then(|| flags.join(","))
}

/// Convert the chat history to Anthropic messages.
///
/// A maximal run of tool results becomes one `user` message. Any other
/// message ends the run. `replay` is prepended to the last assistant
/// message, and an assistant message left with no content is dropped.
fn convert_messages<'a>(
    messages: &'a [ChatMessage],
    replay: &'a [ThinkingBlock],
) -> Vec<Message<'a>> {
    let last_assistant = messages
        .iter()
        .rposition(|m| matches!(m, ChatMessage::Assistant { .. }));
    let mut out: Vec<Message<'_>> = Vec::with_capacity(messages.len());
    let mut in_tool_run = false;

    for (index, message) in messages.iter().enumerate() {
        match message {
            ChatMessage::User { text } => {
                in_tool_run = false;
                out.push(Message {
                    role: "user",
                    content: vec![ContentBlock::Text { text }],
                });
            }
            ChatMessage::Assistant { text, tool_calls } => {
                in_tool_run = false;
                let thinking: &[ThinkingBlock] = if Some(index) == last_assistant {
                    replay
                } else {
                    &[]
                };
                let content = assistant_blocks(thinking, text, tool_calls);
                if content.is_empty() {
                    continue;
                }
                out.push(Message {
                    role: "assistant",
                    content,
                });
            }
            ChatMessage::Tool(result) => {
                let block = ContentBlock::ToolResult {
                    tool_use_id: &result.id,
                    content: &result.output,
                };
                match out.last_mut() {
                    Some(batch) if in_tool_run => batch.content.push(block),
                    _ => out.push(Message {
                        role: "user",
                        content: vec![block],
                    }),
                }
                in_tool_run = true;
            }
        }
    }
    out
}

fn assistant_blocks<'a>(
    thinking: &'a [ThinkingBlock],
    text: &'a str,
    tool_calls: &'a [ToolCall],
) -> Vec<ContentBlock<'a>> {
    let mut blocks = Vec::with_capacity(thinking.len() + tool_calls.len() + 1);
    blocks.extend(thinking.iter().map(|block| match block {
        ThinkingBlock::Thinking {
            thinking,
            signature,
        } => ContentBlock::Thinking {
            thinking,
            signature,
        },
        ThinkingBlock::Redacted { data } => ContentBlock::RedactedThinking { data },
    }));
    // The API rejects empty text blocks.
    if !text.is_empty() {
        blocks.push(ContentBlock::Text { text });
    }
    blocks.extend(tool_calls.iter().map(|call| ContentBlock::ToolUse {
        id: &call.id,
        name: &call.name,
        input: &call.arguments,
    }));
    blocks
}

// ── Response conversion ──────────────────────────────────────────────

/// Convert an Anthropic response into a turn.
///
/// Text blocks are concatenated in order. Thinking text lands in
/// [`AnthropicExt::thinking`] and the raw blocks, signatures included, in
/// [`AnthropicExt::thinking_blocks`]; the rest of `ext` carries over
/// unchanged.
pub(crate) fn convert_response(
    response: Response,
    ext: &AnthropicExt,
) -> Result<Turn<AnthropicExt>, LlmError> {
    let mut text = String::new();
    let mut thinking: Option<String> = None;
    let mut thinking_blocks = Vec::new();
    let mut tool_calls = Vec::new();

    for block in response.content {
        match block.content_type.as_str() {
            "text" => text.push_str(block.text.as_deref().unwrap_or_default()),
            "thinking" => {
                let t = block.thinking.unwrap_or_default();
                thinking.get_or_insert_with(String::new).push_str(&t);
                thinking_blocks.push(ThinkingBlock::Thinking {
                    thinking: t,
                    signature: block.signature.unwrap_or_default(),
                });
            }
            "redacted_thinking" => {
                if let Some(data) = block.data {
                    thinking_blocks.push(ThinkingBlock::Redacted { data });
                }
            }
            "tool_use" => {
                let id = block
                    .id
                    .ok_or_else(|| LlmError::Decode("anthropic tool_use block missing id".into()))?;
                let name = block.name.ok_or_else(|| {
                    LlmError::Decode("anthropic tool_use block missing name".into())
                })?;
                tool_calls.push(ToolCall {
                    id,
                    name,
                    arguments: block
                        .input
                        .unwrap_or_else(|| Value::Object(Map::new())),
                });
            }
            other => warn!(content_type = other, "ignoring unknown anthropic content block"),
        }
    }

    Ok(Turn {
        text,
        tool_calls,
        stop_reason: response.stop_reason,
        ext: AnthropicExt {
            thinking,
            thinking_blocks,
            ..ext.clone()
        },
    })
}

/// Extract the message from an Anthropic error body.
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
            display_name: m.display_name,
            owned_by: Some("anthropic".into()),
            size: None,
        })
        .collect()
}
