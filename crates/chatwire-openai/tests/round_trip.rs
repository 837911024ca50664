//! End-to-end tests for the `OpenAI` adapter over a mock transport.

use chatwire::mock::MockTransport;
use chatwire::{Adapter, LlmError, Step, ToolDefinition, ToolRegistry, step, tool_fn};
use chatwire_openai::{OpenAiAdapter, OpenAiChat, OpenAiConfig, ReasoningEffort};
use serde::Deserialize;
use serde_json::json;

fn adapter() -> OpenAiAdapter {
    OpenAiAdapter::new(OpenAiConfig {
        api_key: "sk-test".into(),
        base_url: "http://openai.test".into(),
        ..Default::default()
    })
}

#[derive(Deserialize)]
struct CityArgs {
    city: String,
}

fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(tool_fn(
        ToolDefinition::new("weather", "Current weather", json!({"type": "object"})),
        |args: CityArgs| async move { Ok(format!("{} is mild", args.city)) },
    ));
    registry
}

fn two_calls() -> serde_json::Value {
    json!({
        "id": "resp_1",
        "status": "completed",
        "output": [
            {"type": "function_call", "call_id": "call_1", "name": "weather", "arguments": "{\"city\":\"Oslo\"}"},
            {"type": "function_call", "call_id": "call_2", "name": "weather", "arguments": "{\"city\":\"Paris\"}"}
        ]
    })
}

#[tokio::test]
async fn test_tool_round_trip_sends_one_output_per_result() {
    let adapter = adapter();
    let transport = MockTransport::new();
    transport.queue_json(&two_calls()).queue_json(&json!({
        "id": "resp_2",
        "status": "completed",
        "output": [{"type": "message", "content": [{"type": "output_text", "text": "Both mild."}]}]
    }));

    let registry = registry();
    let chat = adapter
        .new_chat("gpt-5")
        .system("Answer briefly.")
        .with_tools(registry.definitions())
        .user("Oslo and Paris?");

    let first = step(&adapter, &transport, chat).await.unwrap();
    let chat = registry.resolve(first).await.unwrap();
    let Step::Done { turn, .. } = step(&adapter, &transport, chat).await.unwrap() else {
        panic!("expected done");
    };
    assert_eq!(turn.text, "Both mild.");

    let sent = transport.last_body();
    let input = sent["input"].as_array().unwrap();
    assert_eq!(input.len(), 6);
    assert_eq!(input[0]["role"], "system");
    assert_eq!(
        input[4],
        json!({"type": "function_call_output", "call_id": "call_1", "output": "\"Oslo is mild\""})
    );
    assert_eq!(input[5]["call_id"], "call_2");
    assert!(sent.get("previous_response_id").is_none());
}

#[tokio::test]
async fn test_stored_continuation() {
    let adapter = adapter();
    let transport = MockTransport::new();
    transport.queue_json(&two_calls()).queue_json(&json!({
        "id": "resp_2",
        "output": [
            {"type": "reasoning", "summary": [{"type": "summary_text", "text": "Looked both up."}]},
            {"type": "message", "content": [{"type": "output_text", "text": "Both mild."}]}
        ]
    }));

    let registry = registry();
    let chat = adapter
        .new_chat("o4-mini")
        .reasoning_effort(ReasoningEffort::High)
        .store(true)
        .with_tools(registry.definitions())
        .user("Oslo and Paris?");

    let first = step(&adapter, &transport, chat).await.unwrap();
    assert_eq!(
        first.chat().ext().previous_response_id.as_deref(),
        Some("resp_1")
    );
    let chat = registry.resolve(first).await.unwrap();
    let second = step(&adapter, &transport, chat).await.unwrap();

    let sent = transport.last_body();
    assert_eq!(sent["previous_response_id"], "resp_1");
    assert_eq!(sent["input"].as_array().unwrap().len(), 2);
    assert_eq!(sent["reasoning"]["effort"], "high");

    let turn = second.turn();
    assert_eq!(turn.ext.previous_response_id.as_deref(), Some("resp_2"));
    assert_eq!(turn.ext.reasoning_summary.as_deref(), Some("Looked both up."));
}

#[tokio::test]
async fn test_unknown_tool_aborts_resolve() {
    let adapter = adapter();
    let transport = MockTransport::new();
    transport.queue_json(&json!({
        "id": "resp_1",
        "output": [{"type": "function_call", "call_id": "c", "name": "stocks", "arguments": "{}"}]
    }));

    let registry = registry();
    let chat = adapter
        .new_chat("gpt-5")
        .with_tools(registry.definitions())
        .user("AAPL?");
    let first = step(&adapter, &transport, chat).await.unwrap();
    let err = registry.resolve(first).await.unwrap_err();
    assert!(matches!(
        err,
        LlmError::Tool(chatwire::ToolError::NotFound(ref name)) if name == "stocks"
    ));
}

#[tokio::test]
async fn test_list_models() {
    let adapter = adapter();
    let transport = MockTransport::new();
    transport.queue_json(&json!({
        "object": "list",
        "data": [
            {"id": "gpt-5", "object": "model", "owned_by": "openai"},
            {"id": "ft:gpt-5:acme", "object": "model", "owned_by": "acme"}
        ]
    }));

    let models = chatwire::list_models(&adapter, &transport).await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[1].owned_by.as_deref(), Some("acme"));
    assert_eq!(transport.recorded_requests()[0].url, "http://openai.test/v1/models");
}
