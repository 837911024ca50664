//! The typestate conversation builder.
//!
//! A [`Chat`] carries its capability state in three type parameters, so
//! invalid construction is rejected by the compiler instead of at runtime:
//!
//! | Parameter | States | Transition |
//! |-----------|--------|------------|
//! | `S` sendability | [`Empty`] → [`Ready`] | first [`user`](Chat::user) message, irreversible |
//! | `T` tools | [`ToolsOff`] → [`ToolsOn`] | [`with_tools`](Chat::with_tools), irreversible |
//! | `F` output format | [`FreeText`] ⇄ [`JsonFormat`] | [`with_json_output`](Chat::with_json_output) / [`with_free_text`](Chat::with_free_text) |
//!
//! Every builder method takes `self` by value and returns the next `Chat`.
//! `Chat` is `Clone`, so a caller that wants to keep the previous value
//! clones before advancing.
//!
//! The system prompt can only be set before the first message:
//!
//! ```compile_fail
//! use chatwire::Chat;
//!
//! let chat = Chat::new("model", ()).user("hi").system("too late");
//! ```
//!
//! Tools can only be enabled once:
//!
//! ```compile_fail
//! use chatwire::Chat;
//!
//! let chat = Chat::new("model", ()).with_tools(vec![]).with_tools(vec![]);
//! ```
//!
//! Assistant seeding needs a user message first:
//!
//! ```compile_fail
//! use chatwire::Chat;
//!
//! let chat = Chat::new("model", ()).assistant("hello");
//! ```

use std::marker::PhantomData;
use std::time::Duration;

use serde_json::Value;

use crate::chat::{Message, ToolDefinition, ToolResult, Turn};
use crate::error::LlmError;

/// No message has been appended yet; the system prompt is still editable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

/// At least one user message exists; the chat can be encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ready;

/// Tool calling is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolsOff;

/// Tool calling is enabled for the rest of the chat's life.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolsOn;

/// The model answers in free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeText;

/// The model answers with JSON matching an output schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Empty {}
    impl Sealed for super::Ready {}
    impl Sealed for super::ToolsOff {}
    impl Sealed for super::ToolsOn {}
    impl Sealed for super::FreeText {}
    impl Sealed for super::JsonFormat {}
}

/// Sendability marker: [`Empty`] or [`Ready`].
pub trait Sendability: sealed::Sealed {}

impl Sendability for Empty {}
impl Sendability for Ready {}

/// Tool capability marker: [`ToolsOff`] or [`ToolsOn`].
pub trait ToolState: sealed::Sealed {
    /// Whether tool definitions are sent.
    const ENABLED: bool;
}

impl ToolState for ToolsOff {
    const ENABLED: bool = false;
}

impl ToolState for ToolsOn {
    const ENABLED: bool = true;
}

/// Output format marker: [`FreeText`] or [`JsonFormat`].
pub trait OutputFormat: sealed::Sealed {
    /// Whether the output schema is sent.
    const JSON: bool;
}

impl OutputFormat for FreeText {
    const JSON: bool = false;
}

impl OutputFormat for JsonFormat {
    const JSON: bool = true;
}

/// An immutable conversation under construction.
///
/// `X` is the active adapter's extension value. The core never looks
/// inside it; adapters read it at encode time and return an updated copy
/// on every [`Turn`].
///
/// ```rust
/// use chatwire::{Chat, ToolDefinition};
/// use serde_json::json;
///
/// let chat = Chat::new("some-model", ())
///     .system("You are terse.")
///     .temperature(0.2)
///     .user("What is the capital of Norway?")
///     .with_tools(vec![ToolDefinition::new(
///         "lookup",
///         "Look up a fact",
///         json!({"type": "object"}),
///     )]);
///
/// assert_eq!(chat.messages().len(), 1);
/// assert_eq!(chat.tools().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Chat<X, S = Empty, T = ToolsOff, F = FreeText> {
    model: String,
    system: Option<String>,
    messages: Vec<Message>,
    tools: Vec<ToolDefinition>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
    output_schema: Option<Value>,
    ext: X,
    _state: PhantomData<fn() -> (S, T, F)>,
}

impl<X> Chat<X> {
    /// Starts an empty chat for `model` with the adapter's extension value.
    ///
    /// Adapters usually wrap this as `new_chat(model)` with their default
    /// extension value.
    pub fn new(model: impl Into<String>, ext: X) -> Self {
        Self {
            model: model.into(),
            system: None,
            messages: Vec::new(),
            tools: Vec::new(),
            temperature: None,
            max_tokens: None,
            timeout: None,
            output_schema: None,
            ext,
            _state: PhantomData,
        }
    }
}

impl<X, S, T, F> Chat<X, S, T, F> {
    fn retag<S2, T2, F2>(self) -> Chat<X, S2, T2, F2> {
        Chat {
            model: self.model,
            system: self.system,
            messages: self.messages,
            tools: self.tools,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: self.timeout,
            output_schema: self.output_schema,
            ext: self.ext,
            _state: PhantomData,
        }
    }

    /// Appends a user message. The chat becomes sendable.
    #[must_use]
    pub fn user(mut self, text: impl Into<String>) -> Chat<X, Ready, T, F> {
        self.messages.push(Message::user(text));
        self.retag()
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the maximum number of output tokens.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the request timeout passed through to the transport.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Constrains output to JSON matching `schema`.
    ///
    /// Calling it again replaces the schema.
    #[must_use]
    pub fn with_json_output(mut self, schema: Value) -> Chat<X, S, T, JsonFormat> {
        self.output_schema = Some(schema);
        self.retag()
    }

    /// Returns to free-text output, dropping any output schema.
    #[must_use]
    pub fn with_free_text(mut self) -> Chat<X, S, T, FreeText> {
        self.output_schema = None;
        self.retag()
    }

    /// Replaces the extension value through `f`.
    #[must_use]
    pub fn map_ext(mut self, f: impl FnOnce(X) -> X) -> Self {
        self.ext = f(self.ext);
        self
    }

    /// Replaces the extension value through a fallible `f`.
    ///
    /// Provider builder methods use this to reject invalid settings
    /// (such as an out-of-range thinking budget) instead of clamping.
    pub fn try_map_ext(
        mut self,
        f: impl FnOnce(X) -> Result<X, LlmError>,
    ) -> Result<Self, LlmError> {
        self.ext = f(self.ext)?;
        Ok(self)
    }

    /// The model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The system prompt, if set.
    pub fn system_prompt(&self) -> Option<&str> {
        self.system.as_deref()
    }

    /// The conversation history, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The sampling temperature, if set.
    pub fn temperature_setting(&self) -> Option<f32> {
        self.temperature
    }

    /// The output token limit, if set.
    pub fn max_tokens_setting(&self) -> Option<u32> {
        self.max_tokens
    }

    /// The transport timeout, if set.
    pub fn timeout_setting(&self) -> Option<Duration> {
        self.timeout
    }

    /// The provider extension value.
    pub fn ext(&self) -> &X {
        &self.ext
    }
}

impl<X, S, T: ToolState, F> Chat<X, S, T, F> {
    /// Tool definitions to send. Empty while tools are disabled.
    pub fn tools(&self) -> &[ToolDefinition] {
        if T::ENABLED { &self.tools } else { &[] }
    }
}

impl<X, S, T, F: OutputFormat> Chat<X, S, T, F> {
    /// The output schema to send. `None` in free-text mode.
    pub fn output_schema(&self) -> Option<&Value> {
        if F::JSON {
            self.output_schema.as_ref()
        } else {
            None
        }
    }
}

impl<X, T, F> Chat<X, Empty, T, F> {
    /// Sets the system prompt. Only possible before the first message.
    #[must_use]
    pub fn system(mut self, text: impl Into<String>) -> Self {
        self.system = Some(text.into());
        self
    }
}

impl<X, T, F> Chat<X, Ready, T, F> {
    /// Appends an assistant message without tool calls (few-shot seeding).
    #[must_use]
    pub fn assistant(mut self, text: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(text));
        self
    }

    /// Folds a decoded turn back into the history.
    ///
    /// Appends the assistant message (text plus tool calls) and adopts the
    /// turn's extension value.
    #[must_use]
    pub fn append_turn(mut self, turn: Turn<X>) -> Self {
        self.messages.push(Message::Assistant {
            text: turn.text,
            tool_calls: turn.tool_calls,
        });
        self.ext = turn.ext;
        self
    }
}

impl<X, S, F> Chat<X, S, ToolsOff, F> {
    /// Enables tool calling with the given definitions.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Chat<X, S, ToolsOn, F> {
        self.tools = tools;
        self.retag()
    }
}

impl<X, F> Chat<X, Ready, ToolsOn, F> {
    /// Appends one tool-result message per result, in order.
    #[must_use]
    pub fn with_tool_results(mut self, results: impl IntoIterator<Item = ToolResult>) -> Self {
        self.messages.extend(results.into_iter().map(Message::Tool));
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::chat::ToolCall;

    fn weather_tool() -> ToolDefinition {
        ToolDefinition::new("weather", "Get weather", json!({"type": "object"}))
    }

    #[test]
    fn test_new_chat_is_empty() {
        let chat: Chat<()> = Chat::new("m", ());
        assert_eq!(chat.model(), "m");
        assert!(chat.messages().is_empty());
        assert!(chat.system_prompt().is_none());
        assert!(chat.tools().is_empty());
        assert!(chat.output_schema().is_none());
    }

    #[test]
    fn test_system_then_user() {
        let chat = Chat::new("m", ()).system("be brief").user("hi");
        assert_eq!(chat.system_prompt(), Some("be brief"));
        assert_eq!(chat.messages(), &[Message::user("hi")]);
    }

    #[test]
    fn test_settings_replace_previous_values() {
        let chat = Chat::new("m", ())
            .temperature(0.1)
            .temperature(0.9)
            .max_tokens(10)
            .timeout(Duration::from_secs(5))
            .user("hi")
            .max_tokens(20);
        assert_eq!(chat.temperature_setting(), Some(0.9));
        assert_eq!(chat.max_tokens_setting(), Some(20));
        assert_eq!(chat.timeout_setting(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_assistant_seeding() {
        let chat = Chat::new("m", ()).user("2+2?").assistant("4").user("3+3?");
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.messages()[1], Message::assistant("4"));
    }

    #[test]
    fn test_json_output_toggles() {
        let schema = json!({"type": "object"});
        let chat = Chat::new("m", ()).user("hi").with_json_output(schema.clone());
        assert_eq!(chat.output_schema(), Some(&schema));

        let chat = chat.with_free_text();
        assert!(chat.output_schema().is_none());

        let chat = chat.with_free_text().with_json_output(json!({"type": "array"}));
        assert_eq!(chat.output_schema(), Some(&json!({"type": "array"})));
    }

    #[test]
    fn test_tools_stay_enabled_across_format_toggles() {
        let chat = Chat::new("m", ())
            .with_tools(vec![weather_tool()])
            .with_json_output(json!({}))
            .with_free_text()
            .user("hi");
        assert_eq!(chat.tools().len(), 1);
    }

    #[test]
    fn test_append_turn_adopts_extension() {
        let chat = Chat::new("m", 0u32).user("hi");
        let turn = Turn {
            text: "calling".into(),
            tool_calls: vec![ToolCall {
                id: "c1".into(),
                name: "weather".into(),
                arguments: json!({}),
            }],
            stop_reason: None,
            ext: 7u32,
        };
        let chat = chat.append_turn(turn);
        assert_eq!(*chat.ext(), 7);
        assert!(matches!(
            &chat.messages()[1],
            Message::Assistant { text, tool_calls } if text == "calling" && tool_calls.len() == 1
        ));
    }

    #[test]
    fn test_tool_results_appended_in_order() {
        let chat = Chat::new("m", ())
            .with_tools(vec![weather_tool()])
            .user("hi")
            .with_tool_results(vec![
                ToolResult {
                    id: "a".into(),
                    name: "weather".into(),
                    output: "1".into(),
                },
                ToolResult {
                    id: "b".into(),
                    name: "weather".into(),
                    output: "2".into(),
                },
            ]);
        let ids: Vec<_> = chat
            .messages()
            .iter()
            .filter_map(|m| match m {
                Message::Tool(r) => Some(r.id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_try_map_ext_propagates_error() {
        let chat = Chat::new("m", 1u32);
        let err = chat
            .try_map_ext(|_| Err(LlmError::config("test", "nope")))
            .unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
    }

    #[test]
    fn test_previous_value_survives_clone() {
        let base = Chat::new("m", ()).user("first");
        let advanced = base.clone().user("second");
        assert_eq!(base.messages().len(), 1);
        assert_eq!(advanced.messages().len(), 2);
    }
}
