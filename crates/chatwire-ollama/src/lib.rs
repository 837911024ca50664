//! Ollama adapter for chatwire.
//!
//! Encodes a [`Chat`](chatwire::Chat) into a non-streaming
//! `POST /api/chat` request for a local Ollama server. Each tool result
//! becomes its own `tool` message. Ollama may omit tool-call ids, in which
//! case ids of the form `ollama-<index>` are synthesized from position.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chatwire::{Adapter, LlmError, Transport, send};
//! use chatwire_ollama::{OllamaAdapter, OllamaChat};
//!
//! # async fn example(transport: impl Transport) -> Result<(), LlmError> {
//! let adapter = OllamaAdapter::default();
//! let chat = adapter.new_chat("qwen3").think(true).user("Is 91 prime?");
//!
//! let turn = send(&adapter, &transport, &chat).await?;
//! println!("{}", turn.text);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod convert;
mod ext;
mod provider;
mod types;

pub use config::OllamaConfig;
pub use ext::{OllamaChat, OllamaExt};
pub use provider::OllamaAdapter;

pub(crate) const PROVIDER: &str = "ollama";
