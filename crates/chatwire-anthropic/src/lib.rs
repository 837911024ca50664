//! Anthropic Messages API adapter for chatwire.
//!
//! Encodes a [`Chat`](chatwire::Chat) into a `POST /v1/messages` request
//! and decodes the reply into a [`Turn`](chatwire::Turn). Consecutive tool
//! results are batched into a single user message, as the API requires.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chatwire::{Adapter, LlmError, Transport, send};
//! use chatwire_anthropic::{AnthropicAdapter, AnthropicChat, AnthropicConfig};
//!
//! # async fn example(transport: impl Transport) -> Result<(), LlmError> {
//! let adapter = AnthropicAdapter::new(AnthropicConfig {
//!     api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
//!     ..Default::default()
//! });
//!
//! let chat = adapter
//!     .new_chat("claude-sonnet-4-20250514")
//!     .system("You are terse.")
//!     .thinking_budget(2048)?
//!     .user("Why is the sky blue?");
//!
//! let turn = send(&adapter, &transport, &chat).await?;
//! println!("{}", turn.text);
//! if let Some(thinking) = &turn.ext.thinking {
//!     println!("(thought: {thinking})");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod convert;
mod ext;
mod provider;
mod types;

pub use config::AnthropicConfig;
pub use ext::{AnthropicChat, AnthropicExt, MIN_THINKING_BUDGET, ThinkingBlock};
pub use provider::AnthropicAdapter;

pub(crate) const PROVIDER: &str = "anthropic";
