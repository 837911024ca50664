//! Ollama extension value and its `Chat` builder methods.

use chatwire::Chat;

/// Per-conversation Ollama state carried by [`Chat`] and returned on
/// every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OllamaExt {
    /// Explicit `think` flag; `None` leaves it to the model.
    pub think: Option<bool>,
    /// Thinking text from the most recent turn.
    pub thinking: Option<String>,
}

/// Ollama-specific builder methods for [`Chat`].
pub trait OllamaChat: Sized {
    /// Turns thinking on or off for models that support it.
    #[must_use]
    fn think(self, enabled: bool) -> Self;
}

impl<S, T, F> OllamaChat for Chat<OllamaExt, S, T, F> {
    fn think(self, enabled: bool) -> Self {
        self.map_ext(|ext| OllamaExt {
            think: Some(enabled),
            ..ext
        })
    }
}
