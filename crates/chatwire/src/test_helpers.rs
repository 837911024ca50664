//! Pre-built fixtures for testing adapters and tool loops.
//!
//! Available with the `test-utils` feature so provider crates can share
//! them in their own test suites. Also compiled under `#[cfg(test)]`.

use serde_json::{Value, json};

use crate::chat::{ToolCall, ToolDefinition, ToolResult, Turn};
use crate::conversation::{Chat, FreeText, Ready, ToolsOn};
use crate::transport::HttpResponse;

/// A `weather` tool taking `{"city": string}`.
pub fn weather_tool() -> ToolDefinition {
    ToolDefinition::new(
        "weather",
        "Get the current weather for a city",
        json!({
            "type": "object",
            "properties": { "city": { "type": "string" } },
            "required": ["city"]
        }),
    )
}

/// Shorthand for a [`ToolCall`].
pub fn tool_call(id: &str, name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        id: id.into(),
        name: name.into(),
        arguments,
    }
}

/// Shorthand for a [`ToolResult`].
pub fn tool_result(id: &str, name: &str, output: &str) -> ToolResult {
    ToolResult {
        id: id.into(),
        name: name.into(),
        output: output.into(),
    }
}

/// A 429 response, optionally carrying `Retry-After`.
pub fn rate_limited(retry_after: Option<u64>) -> HttpResponse {
    let resp = HttpResponse::with_status(http::StatusCode::TOO_MANY_REQUESTS, "");
    match retry_after {
        Some(secs) => resp.header_pair("Retry-After", secs.to_string()),
        None => resp,
    }
}

/// Builds the canonical two-call round trip on top of `chat`:
///
/// 1. user: "Weather in Oslo and Paris?"
/// 2. assistant: "Checking both." with calls `call_1`/`call_2` to `weather`
/// 3. tool result for `call_1`
/// 4. tool result for `call_2`
pub fn two_tool_call_history<X: Clone>(chat: Chat<X>) -> Chat<X, Ready, ToolsOn, FreeText> {
    let ext = chat.ext().clone();
    chat.with_tools(vec![weather_tool()])
        .user("Weather in Oslo and Paris?")
        .append_turn(Turn {
            text: "Checking both.".into(),
            tool_calls: vec![
                tool_call("call_1", "weather", json!({"city": "Oslo"})),
                tool_call("call_2", "weather", json!({"city": "Paris"})),
            ],
            stop_reason: None,
            ext,
        })
        .with_tool_results(vec![
            tool_result("call_1", "weather", r#"{"temp":3}"#),
            tool_result("call_2", "weather", r#"{"temp":11}"#),
        ])
}
