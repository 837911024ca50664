//! Gemini extension value and its `Chat` builder methods.

use std::collections::BTreeMap;

use chatwire::{Chat, LlmError};

/// Budget value asking the model to size its own thinking.
pub const DYNAMIC_THINKING_BUDGET: i32 = -1;

/// Largest fixed thinking budget accepted.
pub const MAX_THINKING_BUDGET: i32 = 24_576;

/// Per-conversation Gemini state carried by [`Chat`] and returned on
/// every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeminiExt {
    /// Thinking budget in tokens. `0` disables thinking,
    /// [`DYNAMIC_THINKING_BUDGET`] lets the model decide.
    pub thinking_budget: Option<i32>,
    /// Ask for thought summaries in the response.
    pub include_thoughts: bool,
    /// Thought text from the most recent turn.
    pub thoughts: Option<String>,
    /// Thought signatures from the most recent turn, keyed by tool-call id.
    ///
    /// Echoed on the matching `functionCall` parts of the last model
    /// message; thinking models reject function-call replays without them.
    pub call_signatures: BTreeMap<String, String>,
}

/// Gemini-specific builder methods for [`Chat`].
///
/// ```rust
/// use chatwire::Adapter;
/// use chatwire_gemini::{GeminiAdapter, GeminiChat, GeminiConfig};
///
/// let adapter = GeminiAdapter::new(GeminiConfig::default());
/// let chat = adapter
///     .new_chat("gemini-2.5-flash")
///     .thinking_budget(-1)
///     .unwrap()
///     .include_thoughts();
/// assert!(chat.ext().include_thoughts);
///
/// assert!(adapter.new_chat("gemini-2.5-flash").thinking_budget(30_000).is_err());
/// ```
pub trait GeminiChat: Sized {
    /// Sets the thinking budget.
    ///
    /// Accepts [`DYNAMIC_THINKING_BUDGET`] or `0..=MAX_THINKING_BUDGET`.
    fn thinking_budget(self, tokens: i32) -> Result<Self, LlmError>;

    /// Requests thought summaries alongside the answer.
    #[must_use]
    fn include_thoughts(self) -> Self;
}

impl<S, T, F> GeminiChat for Chat<GeminiExt, S, T, F> {
    fn thinking_budget(self, tokens: i32) -> Result<Self, LlmError> {
        self.try_map_ext(|ext| {
            if tokens != DYNAMIC_THINKING_BUDGET && !(0..=MAX_THINKING_BUDGET).contains(&tokens) {
                return Err(LlmError::config(
                    crate::PROVIDER,
                    format!(
                        "thinking budget must be {DYNAMIC_THINKING_BUDGET} or between 0 and \
                         {MAX_THINKING_BUDGET}, got {tokens}"
                    ),
                ));
            }
            Ok(GeminiExt {
                thinking_budget: Some(tokens),
                ..ext
            })
        })
    }

    fn include_thoughts(self) -> Self {
        self.map_ext(|ext| GeminiExt {
            include_thoughts: true,
            ..ext
        })
    }
}
