//! Gemini `generateContent` adapter for chatwire.
//!
//! Encodes a [`Chat`](chatwire::Chat) into a
//! `POST /v1beta/models/<model>:generateContent` request. The system prompt
//! travels as `systemInstruction`, assistant turns use the `model` role,
//! and each tool result becomes its own `functionResponse` content.
//!
//! Gemini assigns no ids to function calls, so decoded calls are numbered
//! `gemini-0`, `gemini-1`, ... in emission order.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chatwire::{Adapter, LlmError, Transport, send};
//! use chatwire_gemini::{GeminiAdapter, GeminiChat, GeminiConfig};
//!
//! # async fn example(transport: impl Transport) -> Result<(), LlmError> {
//! let adapter = GeminiAdapter::new(GeminiConfig {
//!     api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
//!     ..Default::default()
//! });
//!
//! let chat = adapter
//!     .new_chat("gemini-2.5-flash")
//!     .thinking_budget(1024)?
//!     .include_thoughts()
//!     .user("What is the capital of Australia?");
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

pub use config::GeminiConfig;
pub use ext::{DYNAMIC_THINKING_BUDGET, GeminiChat, GeminiExt, MAX_THINKING_BUDGET};
pub use provider::GeminiAdapter;

pub(crate) const PROVIDER: &str = "gemini";
