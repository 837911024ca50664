//! Tool dispatch and the tool-call round trip.
//!
//! ```text
//!   ToolHandler    : definition + decode-args-then-execute
//!       │
//!   ToolRegistry   : handlers by name; dispatch() runs calls in order
//!       │
//!   step()         : one send, classified as Done or ToolCall
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use chatwire::tool::{Step, ToolRegistry, step, tool_fn};
//! use chatwire::{Adapter, LlmError, ToolDefinition, Transport};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct Args {
//!     city: String,
//! }
//!
//! # async fn example<A: Adapter>(adapter: &A, transport: &impl Transport) -> Result<(), LlmError> {
//! let mut registry = ToolRegistry::new();
//! registry.register(tool_fn(
//!     ToolDefinition::new("weather", "Current weather", json!({"type": "object"})),
//!     |args: Args| async move { Ok(json!({"city": args.city, "temp": 21})) },
//! ));
//!
//! let mut chat = adapter
//!     .new_chat("some-model")
//!     .with_tools(registry.definitions())
//!     .user("Weather in Lisbon?");
//!
//! let answer = loop {
//!     match step(adapter, transport, chat).await? {
//!         Step::Done { turn, .. } => break turn.text,
//!         next @ Step::ToolCall { .. } => chat = registry.resolve(next).await?,
//!     }
//! };
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```
//!
//! Adapters apply their own batching when encoding the tool results that
//! `resolve` appends; the stored history always holds one message per
//! result.

mod error;
mod handler;
mod registry;
mod step;

pub use error::ToolError;
pub use handler::{FnToolHandler, ToolFuture, ToolHandler, tool_fn};
pub use registry::ToolRegistry;
pub use step::{Step, step};
