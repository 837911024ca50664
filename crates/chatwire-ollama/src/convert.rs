//! Conversion between `chatwire` types and Ollama API types.

use chatwire::conversation::{OutputFormat, ToolState};
use chatwire::{Chat, LlmError, Message as ChatMessage, ModelInfo, ToolCall, Turn};
use serde_json::{Map, Value};

use crate::config::OllamaConfig;
use crate::ext::OllamaExt;
use crate::types::{
    ErrorResponse, FunctionCallRequest, FunctionDef, Message, Options, Request, Response,
    TagsResponse, Tool, ToolCallRequest, ToolCallResponse,
};

// ── Request conversion ───────────────────────────────────────────────

/// Build an Ollama `/api/chat` request body.
pub(crate) fn build_request<'a, S, T: ToolState, F: OutputFormat>(
    chat: &'a Chat<OllamaExt, S, T, F>,
    config: &'a OllamaConfig,
) -> Request<'a> {
    let temperature = chat.temperature_setting();
    let num_predict = chat.max_tokens_setting();
    let options = (temperature.is_some() || num_predict.is_some()).then_some(Options {
        temperature,
        num_predict,
    });

    Request {
        model: chat.model(),
        messages: convert_messages(chat.system_prompt(), chat.messages()),
        stream: false,
        tools: chat
            .tools()
            .iter()
            .map(|t| Tool {
                tool_type: "function",
                function: FunctionDef {
                    name: &t.name,
                    description: &t.description,
                    parameters: &t.parameters,
                },
            })
            .collect(),
        format: chat.output_schema(),
        options,
        think: chat.ext().think,
        keep_alive: config.keep_alive.as_deref(),
    }
}

/// System prompt first, then one message per history entry.
fn convert_messages<'a>(system: Option<&'a str>, messages: &'a [ChatMessage]) -> Vec<Message<'a>> {
    let system = system.map(|content| Message {
        role: "system",
        content,
        tool_calls: Vec::new(),
        tool_name: None,
    });
    system
        .into_iter()
        .chain(messages.iter().map(|message| match message {
            ChatMessage::User { text } => Message {
                role: "user",
                content: text,
                tool_calls: Vec::new(),
                tool_name: None,
            },
            ChatMessage::Assistant { text, tool_calls } => Message {
                role: "assistant",
                content: text,
                tool_calls: tool_calls
                    .iter()
                    .map(|call| ToolCallRequest {
                        function: FunctionCallRequest {
                            name: &call.name,
                            arguments: &call.arguments,
                        },
                    })
                    .collect(),
                tool_name: None,
            },
            ChatMessage::Tool(result) => Message {
                role: "tool",
                content: &result.output,
                tool_calls: Vec::new(),
                tool_name: Some(&result.name),
            },
        }))
        .collect()
}

// ── Response conversion ──────────────────────────────────────────────

/// Convert an Ollama response into a turn.
pub(crate) fn convert_response(
    response: Response,
    ext: &OllamaExt,
) -> Result<Turn<OllamaExt>, LlmError> {
    let (text, thinking, tool_calls) = match response.message {
        Some(message) => {
            let tool_calls = message
                .tool_calls
                .into_iter()
                .enumerate()
                .map(|(index, call)| convert_tool_call(index, call))
                .collect::<Result<Vec<_>, _>>()?;
            (
                message.content.unwrap_or_default(),
                message.thinking.filter(|t| !t.is_empty()),
                tool_calls,
            )
        }
        None => (String::new(), None, Vec::new()),
    };

    Ok(Turn {
        text,
        tool_calls,
        stop_reason: response.done_reason,
        ext: OllamaExt {
            thinking,
            ..ext.clone()
        },
    })
}

/// Ids are synthesized from position when the server sends none.
fn convert_tool_call(index: usize, call: ToolCallResponse) -> Result<ToolCall, LlmError> {
    let name = call.function.name;
    let arguments = match call.function.arguments {
        Value::Null => Value::Object(Map::new()),
        Value::String(raw) if raw.trim().is_empty() => Value::Object(Map::new()),
        // Some models emit the arguments pre-serialized.
        Value::String(raw) => serde_json::from_str(&raw).map_err(|e| {
            LlmError::Decode(format!(
                "ollama tool call arguments for {name} are not valid JSON: {e}"
            ))
        })?,
        other => other,
    };
    Ok(ToolCall {
        id: call
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("{}-{index}", crate::PROVIDER)),
        name,
        arguments,
    })
}

/// Extract the message from an Ollama error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error)
}

/// Convert a `GET /api/tags` response.
pub(crate) fn convert_models(response: TagsResponse) -> Vec<ModelInfo> {
    response
        .models
        .into_iter()
        .map(|m| ModelInfo {
            id: m.name,
            display_name: None,
            owned_by: None,
            size: m.size,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwire::test_helpers::{two_tool_call_history, weather_tool};
    use serde_json::json;

    fn chat() -> Chat<OllamaExt> {
        Chat::new("llama3.2", OllamaExt::default())
    }

    fn body<S, T: ToolState, F: OutputFormat>(chat: &Chat<OllamaExt, S, T, F>) -> Value {
        serde_json::to_value(build_request(chat, &OllamaConfig::default())).unwrap()
    }

    fn response(value: Value) -> Response {
        serde_json::from_value(value).unwrap()
    }

    // ── Request ─────────────────────────────────────────────────────

    #[test]
    fn test_minimal_request() {
        assert_eq!(
            body(&chat().user("Hello")),
            json!({
                "model": "llama3.2",
                "messages": [{"role": "user", "content": "Hello"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_system_prompt_is_leading_message() {
        let json = body(&chat().system("Be brief.").user("Hi"));
        assert_eq!(json["messages"][0], json!({"role": "system", "content": "Be brief."}));
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn test_one_tool_message_per_result() {
        let json = body(&two_tool_call_history(chat()));
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(
            messages[1]["tool_calls"],
            json!([
                {"function": {"name": "weather", "arguments": {"city": "Oslo"}}},
                {"function": {"name": "weather", "arguments": {"city": "Paris"}}}
            ])
        );
        assert_eq!(
            messages[2],
            json!({"role": "tool", "content": "{\"temp\":3}", "tool_name": "weather"})
        );
        assert_eq!(messages[3]["content"], "{\"temp\":11}");
    }

    #[test]
    fn test_options_format_think_keep_alive() {
        let schema = json!({"type": "object"});
        let chat = chat()
            .temperature(0.5)
            .max_tokens(64)
            .with_tools(vec![weather_tool()])
            .with_json_output(schema.clone())
            .map_ext(|e| OllamaExt {
                think: Some(true),
                ..e
            })
            .user("Hi");
        let config = OllamaConfig {
            keep_alive: Some("5m".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(build_request(&chat, &config)).unwrap();
        assert_eq!(json["options"], json!({"temperature": 0.5, "num_predict": 64}));
        assert_eq!(json["format"], schema);
        assert_eq!(json["think"], true);
        assert_eq!(json["keep_alive"], "5m");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "weather");
    }

    #[test]
    fn test_think_false_is_sent() {
        use crate::ext::OllamaChat;

        assert!(body(&chat().user("Hi")).get("think").is_none());
        assert_eq!(body(&chat().think(false).user("Hi"))["think"], false);
    }

    // ── Response ────────────────────────────────────────────────────

    #[test]
    fn test_text_and_thinking() {
        let turn = convert_response(
            response(json!({
                "message": {"role": "assistant", "content": "Hello there!", "thinking": "greet"},
                "done": true,
                "done_reason": "stop"
            })),
            &OllamaExt::default(),
        )
        .unwrap();
        assert_eq!(turn.text, "Hello there!");
        assert_eq!(turn.ext.thinking.as_deref(), Some("greet"));
        assert_eq!(turn.stop_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_tool_call_ids_synthesized_by_position() {
        let turn = convert_response(
            response(json!({
                "message": {"role": "assistant", "content": "", "tool_calls": [
                    {"function": {"name": "weather", "arguments": {"city": "Oslo"}}},
                    {"function": {"name": "weather", "arguments": "{\"city\":\"Paris\"}"}}
                ]},
                "done": true
            })),
            &OllamaExt::default(),
        )
        .unwrap();
        assert_eq!(turn.tool_calls[0].id, "ollama-0");
        assert_eq!(turn.tool_calls[1].id, "ollama-1");
        assert_eq!(turn.tool_calls[1].arguments, json!({"city": "Paris"}));
    }

    #[test]
    fn test_missing_or_blank_arguments_become_empty_object() {
        let turn = convert_response(
            response(json!({
                "message": {"content": "", "tool_calls": [
                    {"function": {"name": "now"}},
                    {"function": {"name": "now", "arguments": ""}}
                ]}
            })),
            &OllamaExt::default(),
        )
        .unwrap();
        assert_eq!(turn.tool_calls[0].arguments, json!({}));
        assert_eq!(turn.tool_calls[1].arguments, json!({}));
    }

    #[test]
    fn test_server_supplied_id_kept() {
        let turn = convert_response(
            response(json!({
                "message": {"content": "", "tool_calls": [
                    {"id": "call_x", "function": {"name": "weather", "arguments": {}}}
                ]}
            })),
            &OllamaExt::default(),
        )
        .unwrap();
        assert_eq!(turn.tool_calls[0].id, "call_x");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error":"model 'nope' not found"}"#).as_deref(),
            Some("model 'nope' not found")
        );
        assert_eq!(error_message("404 page not found"), None);
    }
}
