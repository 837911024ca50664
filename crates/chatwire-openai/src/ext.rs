//! `OpenAI` extension value and its `Chat` builder methods.

use chatwire::Chat;
use serde::Serialize;

/// How much reasoning the model should spend before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    /// Fewest reasoning tokens.
    Minimal,
    /// Light reasoning.
    Low,
    /// The API default.
    Medium,
    /// Most reasoning tokens.
    High,
}

/// Per-conversation `OpenAI` state carried by [`Chat`] and returned on
/// every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenAiExt {
    /// Requested reasoning effort; `None` leaves it to the model.
    pub reasoning_effort: Option<ReasoningEffort>,
    /// Whether responses are stored server-side for continuation.
    pub store: bool,
    /// Id of the stored response the next request continues from.
    ///
    /// Set by decoding when `store` is on. While present, encoding sends
    /// only the messages added after the last assistant message.
    pub previous_response_id: Option<String>,
    /// Reasoning summary text from the most recent turn.
    pub reasoning_summary: Option<String>,
}

/// `OpenAI`-specific builder methods for [`Chat`].
///
/// ```rust
/// use chatwire::Adapter;
/// use chatwire_openai::{OpenAiAdapter, OpenAiChat, OpenAiConfig, ReasoningEffort};
///
/// let adapter = OpenAiAdapter::new(OpenAiConfig::default());
/// let chat = adapter
///     .new_chat("o4-mini")
///     .reasoning_effort(ReasoningEffort::High)
///     .store(true)
///     .user("Plan a three-day trip to Kyoto.");
/// assert!(chat.ext().store);
/// ```
pub trait OpenAiChat: Sized {
    /// Sets the reasoning effort and requests a reasoning summary.
    #[must_use]
    fn reasoning_effort(self, effort: ReasoningEffort) -> Self;

    /// Turns server-side storage, and with it continuation, on or off.
    ///
    /// Turning it off also forgets any recorded response id.
    #[must_use]
    fn store(self, store: bool) -> Self;
}

impl<S, T, F> OpenAiChat for Chat<OpenAiExt, S, T, F> {
    fn reasoning_effort(self, effort: ReasoningEffort) -> Self {
        self.map_ext(|ext| OpenAiExt {
            reasoning_effort: Some(effort),
            ..ext
        })
    }

    fn store(self, store: bool) -> Self {
        self.map_ext(|ext| OpenAiExt {
            store,
            previous_response_id: if store { ext.previous_response_id } else { None },
            ..ext
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effort_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ReasoningEffort::Minimal).unwrap(),
            "minimal"
        );
    }

    #[test]
    fn test_store_off_forgets_continuation() {
        let chat = Chat::new(
            "gpt-5",
            OpenAiExt {
                store: true,
                previous_response_id: Some("resp_1".into()),
                ..Default::default()
            },
        )
        .store(false);
        assert!(!chat.ext().store);
        assert!(chat.ext().previous_response_id.is_none());
    }
}
