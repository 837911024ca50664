//! `OpenAI` Responses API adapter for chatwire.
//!
//! Encodes a [`Chat`](chatwire::Chat) into a `POST /v1/responses` request.
//! Tool calls and tool results travel as separate `function_call` and
//! `function_call_output` input items. With [`OpenAiChat::store`] on, each
//! turn records the response id and the next request continues from it,
//! sending only the new items.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chatwire::{Adapter, LlmError, Transport, send};
//! use chatwire_openai::{OpenAiAdapter, OpenAiChat, OpenAiConfig, ReasoningEffort};
//!
//! # async fn example(transport: impl Transport) -> Result<(), LlmError> {
//! let adapter = OpenAiAdapter::new(OpenAiConfig {
//!     api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
//!     ..Default::default()
//! });
//!
//! let chat = adapter
//!     .new_chat("o4-mini")
//!     .reasoning_effort(ReasoningEffort::Medium)
//!     .store(true)
//!     .user("Name three prime numbers.");
//!
//! let turn = send(&adapter, &transport, &chat).await?;
//! let chat = chat.append_turn(turn).user("Now three more.");
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

pub use config::OpenAiConfig;
pub use ext::{OpenAiChat, OpenAiExt, ReasoningEffort};
pub use provider::OpenAiAdapter;

pub(crate) const PROVIDER: &str = "openai";
