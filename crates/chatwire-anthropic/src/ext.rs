//! Anthropic extension value and its `Chat` builder methods.

use chatwire::{Chat, LlmError};

/// Smallest thinking budget the Messages API accepts.
pub const MIN_THINKING_BUDGET: u32 = 1024;

/// Per-conversation Anthropic state carried by [`Chat`] and returned on
/// every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnthropicExt {
    /// Extended thinking budget in tokens; `None` disables thinking.
    pub thinking_budget: Option<u32>,
    /// Requests interleaved thinking between tool calls (beta).
    pub interleaved_thinking: bool,
    /// Thinking text from the most recent turn.
    pub thinking: Option<String>,
    /// Raw thinking blocks from the most recent turn.
    ///
    /// Sent back ahead of the last assistant message on the next request;
    /// the API requires them there while a tool call is being resolved.
    pub thinking_blocks: Vec<ThinkingBlock>,
}

/// A thinking block exactly as the Messages API returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThinkingBlock {
    /// Visible thinking.
    Thinking {
        /// The thinking text.
        thinking: String,
        /// Signature over the text, checked by the API on replay.
        signature: String,
    },
    /// Thinking the API chose to encrypt.
    Redacted {
        /// Opaque encrypted payload.
        data: String,
    },
}

/// Anthropic-specific builder methods for [`Chat`].
///
/// ```rust
/// use chatwire::Adapter;
/// use chatwire_anthropic::{AnthropicAdapter, AnthropicChat, AnthropicConfig};
///
/// let adapter = AnthropicAdapter::new(AnthropicConfig::default());
/// let chat = adapter
///     .new_chat("claude-sonnet-4-20250514")
///     .thinking_budget(2048)
///     .unwrap()
///     .user("Prove there are infinitely many primes.");
///
/// assert!(adapter.new_chat("claude").thinking_budget(100).is_err());
/// ```
pub trait AnthropicChat: Sized {
    /// Enables extended thinking with `tokens` of budget.
    ///
    /// Budgets below [`MIN_THINKING_BUDGET`] are rejected, not clamped.
    /// Unless interleaved thinking is on, the budget must also stay below
    /// the request's `max_tokens`; encoding fails otherwise.
    fn thinking_budget(self, tokens: u32) -> Result<Self, LlmError>;

    /// Enables interleaved thinking; adds the matching beta header.
    #[must_use]
    fn interleaved_thinking(self) -> Self;
}

impl<S, T, F> AnthropicChat for Chat<AnthropicExt, S, T, F> {
    fn thinking_budget(self, tokens: u32) -> Result<Self, LlmError> {
        self.try_map_ext(|ext| {
            if tokens < MIN_THINKING_BUDGET {
                return Err(LlmError::config(
                    crate::PROVIDER,
                    format!(
                        "thinking budget must be at least {MIN_THINKING_BUDGET} tokens, got {tokens}"
                    ),
                ));
            }
            Ok(AnthropicExt {
                thinking_budget: Some(tokens),
                ..ext
            })
        })
    }

    fn interleaved_thinking(self) -> Self {
        self.map_ext(|ext| AnthropicExt {
            interleaved_thinking: true,
            ..ext
        })
    }
}
