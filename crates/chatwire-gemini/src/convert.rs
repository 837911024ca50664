//! Conversion between `chatwire` types and Gemini API types.
//!
//! Gemini sends no tool-call ids. Calls are numbered `gemini-<n>` in
//! emission order, counting function-call parts only, and results are
//! matched back by function name on the wire.

use std::collections::BTreeMap;

use chatwire::conversation::{OutputFormat, ToolState};
use chatwire::{Chat, Message, ModelInfo, ToolCall, ToolResult, Turn};
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::ext::GeminiExt;
use crate::types::{
    Content, ErrorResponse, FunctionDeclaration, GenerationConfig, ModelsResponse, Part, PartData,
    Request, Response, SystemInstruction, ThinkingConfig, Tools,
};

// ── Request conversion ───────────────────────────────────────────────

/// Build a `generateContent` request body.
pub(crate) fn build_request<S, T: ToolState, F: OutputFormat>(
    chat: &Chat<GeminiExt, S, T, F>,
) -> Request<'_> {
    let tools = chat.tools();
    Request {
        contents: convert_contents(chat.messages(), &chat.ext().call_signatures),
        system_instruction: chat.system_prompt().map(|text| SystemInstruction {
            parts: vec![Part::text(text)],
        }),
        tools: if tools.is_empty() {
            Vec::new()
        } else {
            vec![Tools {
                function_declarations: tools
                    .iter()
                    .map(|t| FunctionDeclaration {
                        name: &t.name,
                        description: &t.description,
                        parameters: &t.parameters,
                    })
                    .collect(),
            }]
        },
        generation_config: generation_config(chat),
    }
}

fn generation_config<S, T, F: OutputFormat>(
    chat: &Chat<GeminiExt, S, T, F>,
) -> Option<GenerationConfig<'_>> {
    let ext = chat.ext();
    let schema = chat.output_schema();
    let thinking_config = (ext.thinking_budget.is_some() || ext.include_thoughts).then(|| {
        ThinkingConfig {
            thinking_budget: ext.thinking_budget,
            include_thoughts: ext.include_thoughts,
        }
    });
    let config = GenerationConfig {
        temperature: chat.temperature_setting(),
        max_output_tokens: chat.max_tokens_setting(),
        response_mime_type: schema.map(|_| "application/json"),
        response_schema: schema,
        thinking_config,
    };
    let empty = config.temperature.is_none()
        && config.max_output_tokens.is_none()
        && config.response_schema.is_none()
        && config.thinking_config.is_none();
    (!empty).then_some(config)
}

/// One content per history entry; each tool result gets its own.
///
/// `signatures` go on the function calls of the last model message. A
/// model message with nothing to send is dropped.
fn convert_contents<'a>(
    messages: &'a [Message],
    signatures: &'a BTreeMap<String, String>,
) -> Vec<Content<'a>> {
    let last_model = messages
        .iter()
        .rposition(|m| matches!(m, Message::Assistant { .. }));
    let mut contents = Vec::with_capacity(messages.len());

    for (index, message) in messages.iter().enumerate() {
        match message {
            Message::User { text } => contents.push(Content {
                role: "user",
                parts: vec![Part::text(text)],
            }),
            Message::Assistant { text, tool_calls } => {
                let latest = Some(index) == last_model;
                let mut parts = Vec::with_capacity(tool_calls.len() + 1);
                if !text.is_empty() {
                    parts.push(Part::text(text));
                }
                parts.extend(tool_calls.iter().map(|call| Part {
                    data: PartData::FunctionCall {
                        name: &call.name,
                        args: &call.arguments,
                    },
                    thought_signature: signatures
                        .get(&call.id)
                        .filter(|_| latest)
                        .map(String::as_str),
                }));
                if !parts.is_empty() {
                    contents.push(Content {
                        role: "model",
                        parts,
                    });
                }
            }
            Message::Tool(result) => contents.push(Content {
                role: "user",
                parts: vec![
                    PartData::FunctionResponse {
                        name: &result.name,
                        response: function_response(result),
                    }
                    .into(),
                ],
            }),
        }
    }
    contents
}

/// `functionResponse.response` must be an object: JSON objects pass
/// through, anything else is wrapped as `{"content": ..}`.
fn function_response(result: &ToolResult) -> Value {
    match serde_json::from_str::<Value>(&result.output) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(other) => json!({ "content": other }),
        Err(_) => json!({ "content": result.output }),
    }
}

// ── Response conversion ──────────────────────────────────────────────

/// Convert a `generateContent` response into a turn.
///
/// Only the first candidate is read. Thought parts go to
/// [`GeminiExt::thoughts`], never into the text, and function-call
/// signatures to [`GeminiExt::call_signatures`].
pub(crate) fn convert_response(response: Response, ext: &GeminiExt) -> Turn<GeminiExt> {
    let mut text = String::new();
    let mut thoughts: Option<String> = None;
    let mut tool_calls = Vec::new();
    let mut call_signatures = BTreeMap::new();

    let candidate = response.candidates.into_iter().next();
    let stop_reason = match &candidate {
        Some(c) => c.finish_reason.clone(),
        None => response.prompt_feedback.and_then(|f| f.block_reason),
    };

    let parts = candidate
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();
    for part in parts {
        if let Some(call) = part.function_call {
            let id = format!("{}-{}", crate::PROVIDER, tool_calls.len());
            if let Some(signature) = part.thought_signature {
                call_signatures.insert(id.clone(), signature);
            }
            tool_calls.push(ToolCall {
                id,
                name: call.name,
                arguments: call.args.unwrap_or_else(|| Value::Object(Map::new())),
            });
        } else if let Some(t) = part.text {
            if part.thought {
                thoughts.get_or_insert_with(String::new).push_str(&t);
            } else {
                text.push_str(&t);
            }
        } else {
            warn!("ignoring gemini part without text or functionCall");
        }
    }

    Turn {
        text,
        tool_calls,
        stop_reason,
        ext: GeminiExt {
            thoughts,
            call_signatures,
            ..ext.clone()
        },
    }
}

/// Extract `status: message` from a Gemini error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let detail = serde_json::from_str::<ErrorResponse>(body).ok()?.error;
    Some(match detail.status {
        Some(status) => format!("{status}: {}", detail.message),
        None => detail.message,
    })
}

/// Convert a `GET /v1beta/models` response.
pub(crate) fn convert_models(response: ModelsResponse) -> Vec<ModelInfo> {
    response
        .models
        .into_iter()
        .map(|m| ModelInfo {
            id: m
                .name
                .strip_prefix("models/")
                .map_or_else(|| m.name.clone(), str::to_owned),
            display_name: m.display_name,
            owned_by: None,
            size: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwire::test_helpers::{two_tool_call_history, weather_tool};

    fn chat() -> Chat<GeminiExt> {
        Chat::new("gemini-2.5-flash", GeminiExt::default())
    }

    fn body<S, T: ToolState, F: OutputFormat>(chat: &Chat<GeminiExt, S, T, F>) -> Value {
        serde_json::to_value(build_request(chat)).unwrap()
    }

    fn response(value: Value) -> Response {
        serde_json::from_value(value).unwrap()
    }

    // ── Request ─────────────────────────────────────────────────────

    #[test]
    fn test_minimal_request() {
        assert_eq!(
            body(&chat().user("Hi")),
            json!({"contents": [{"role": "user", "parts": [{"text": "Hi"}]}]})
        );
    }

    #[test]
    fn test_system_instruction() {
        let json = body(&chat().system("Be brief.").user("Hi"));
        assert_eq!(json["systemInstruction"], json!({"parts": [{"text": "Be brief."}]}));
        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_one_function_response_content_per_result() {
        let json = body(&two_tool_call_history(chat()));
        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 4);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(
            contents[1]["parts"],
            json!([
                {"text": "Checking both."},
                {"functionCall": {"name": "weather", "args": {"city": "Oslo"}}},
                {"functionCall": {"name": "weather", "args": {"city": "Paris"}}}
            ])
        );
        assert_eq!(
            contents[2],
            json!({"role": "user", "parts": [
                {"functionResponse": {"name": "weather", "response": {"temp": 3}}}
            ]})
        );
        assert_eq!(
            contents[3]["parts"][0]["functionResponse"]["response"],
            json!({"temp": 11})
        );
    }

    #[test]
    fn test_empty_model_message_dropped() {
        let chat = chat()
            .user("x")
            .append_turn(Turn {
                text: String::new(),
                tool_calls: Vec::new(),
                stop_reason: Some("MAX_TOKENS".into()),
                ext: GeminiExt::default(),
            })
            .user("continue");
        let json = body(&chat);
        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 2);
        assert!(contents.iter().all(|c| c["role"] == "user"));
    }

    #[test]
    fn test_signatures_replayed_on_last_model_message() {
        let turn = convert_response(
            response(json!({"candidates": [{"content": {"role": "model", "parts": [
                {"functionCall": {"name": "weather", "args": {"city": "Oslo"}}, "thoughtSignature": "sig_a"},
                {"functionCall": {"name": "weather", "args": {"city": "Paris"}}}
            ]}}]})),
            &GeminiExt::default(),
        );
        assert_eq!(turn.ext.call_signatures.get("gemini-0").map(String::as_str), Some("sig_a"));
        assert!(!turn.ext.call_signatures.contains_key("gemini-1"));

        let chat = chat()
            .with_tools(vec![weather_tool()])
            .user("Oslo?")
            .append_turn(Turn {
                text: String::new(),
                tool_calls: vec![chatwire::test_helpers::tool_call(
                    "gemini-0",
                    "weather",
                    json!({"city": "Bergen"}),
                )],
                stop_reason: None,
                ext: GeminiExt::default(),
            })
            .with_tool_results(vec![chatwire::test_helpers::tool_result(
                "gemini-0", "weather", "{}",
            )])
            .user("And now?")
            .append_turn(turn);
        let json = body(&chat);
        let contents = json["contents"].as_array().unwrap();

        // The older model message shares the id but gets no signature.
        assert!(contents[1]["parts"][0].get("thoughtSignature").is_none());
        assert_eq!(contents[4]["parts"][0]["thoughtSignature"], "sig_a");
        assert!(contents[4]["parts"][1].get("thoughtSignature").is_none());
    }

    #[test]
    fn test_non_object_outputs_wrapped() {
        let wrap = |output: &str| {
            function_response(&ToolResult {
                id: "gemini-0".into(),
                name: "f".into(),
                output: output.into(),
            })
        };
        assert_eq!(wrap("\"sunny\""), json!({"content": "sunny"}));
        assert_eq!(wrap("[1,2]"), json!({"content": [1, 2]}));
        assert_eq!(wrap("not json"), json!({"content": "not json"}));
    }

    #[test]
    fn test_tools_and_generation_config() {
        let schema = json!({"type": "object"});
        let chat = chat()
            .temperature(0.5)
            .max_tokens(128)
            .with_tools(vec![weather_tool()])
            .with_json_output(schema.clone())
            .map_ext(|e| GeminiExt {
                thinking_budget: Some(0),
                ..e
            })
            .user("Hi");
        let json = body(&chat);
        assert_eq!(json["tools"][0]["functionDeclarations"][0]["name"], "weather");
        assert_eq!(
            json["generationConfig"],
            json!({
                "temperature": 0.5,
                "maxOutputTokens": 128,
                "responseMimeType": "application/json",
                "responseSchema": schema,
                "thinkingConfig": {"thinkingBudget": 0}
            })
        );
    }

    // ── Response ────────────────────────────────────────────────────

    #[test]
    fn test_text_parts_concatenated() {
        let turn = convert_response(
            response(json!({"candidates": [{"content": {"role": "model", "parts": [
                {"text": "Hello "}, {"text": "there"}, {"text": "!"}
            ]}, "finishReason": "STOP"}]})),
            &GeminiExt::default(),
        );
        assert_eq!(turn.text, "Hello there!");
        assert_eq!(turn.stop_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_function_call_ids_synthesized() {
        let turn = convert_response(
            response(json!({"candidates": [{"content": {"role": "model", "parts": [
                {"functionCall": {"name": "weather", "args": {"city": "Oslo"}}},
                {"functionCall": {"name": "time", "args": {"tz": "CET"}}}
            ]}}]})),
            &GeminiExt::default(),
        );
        let ids: Vec<_> = turn.tool_calls.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["gemini-0", "gemini-1"]);
        assert_eq!(turn.tool_calls[1].name, "time");
    }

    #[test]
    fn test_ids_count_function_calls_only() {
        let turn = convert_response(
            response(json!({"candidates": [{"content": {"parts": [
                {"text": "Let me check."},
                {"functionCall": {"name": "weather"}}
            ]}}]})),
            &GeminiExt::default(),
        );
        assert_eq!(turn.tool_calls[0].id, "gemini-0");
        assert_eq!(turn.tool_calls[0].arguments, json!({}));
        assert_eq!(turn.text, "Let me check.");
    }

    #[test]
    fn test_thoughts_kept_out_of_text() {
        let turn = convert_response(
            response(json!({"candidates": [{"content": {"parts": [
                {"text": "Considering...", "thought": true},
                {"text": "42"}
            ]}}]})),
            &GeminiExt {
                include_thoughts: true,
                ..Default::default()
            },
        );
        assert_eq!(turn.text, "42");
        assert_eq!(turn.ext.thoughts.as_deref(), Some("Considering..."));
        assert!(turn.ext.include_thoughts);
    }

    #[test]
    fn test_blocked_prompt_has_no_candidates() {
        let turn = convert_response(
            response(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
            &GeminiExt::default(),
        );
        assert!(turn.text.is_empty());
        assert_eq!(turn.stop_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("INVALID_ARGUMENT: API key not valid.")
        );
        assert_eq!(error_message("{}"), None);
    }

    #[test]
    fn test_convert_models_strips_prefix() {
        let models = convert_models(
            serde_json::from_value(json!({"models": [
                {"name": "models/gemini-2.5-pro", "displayName": "Gemini 2.5 Pro"}
            ]}))
            .unwrap(),
        );
        assert_eq!(models[0].id, "gemini-2.5-pro");
        assert_eq!(models[0].display_name.as_deref(), Some("Gemini 2.5 Pro"));
    }
}
