//! # chatwire
//!
//! Provider-agnostic conversation model and wire adapters for LLM HTTP APIs.
//!
//! This crate defines the shared vocabulary every adapter speaks: messages,
//! tool calls and results, the typestate [`Chat`] builder, turns, and the
//! closed [`LlmError`] taxonomy. It performs no network I/O: adapters turn
//! a `Chat` into an [`HttpRequest`] and an [`HttpResponse`] into a [`Turn`],
//! and the caller's [`Transport`] moves bytes in between.
//!
//! # Adapter crates
//!
//! | Crate | Provider | Tool results on the wire |
//! |-------|----------|--------------------------|
//! | `chatwire-openai` | Responses API | one `function_call_output` item each |
//! | `chatwire-anthropic` | Messages API | batched into one user message |
//! | `chatwire-ollama` | local `/api/chat` | one `tool` message each |
//! | `chatwire-gemini` | `generateContent` | one `functionResponse` content each |
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────────┐ ┌──────────────────┐ ┌──────────────┐ ┌──────────────┐
//!  │ -openai      │ │ -anthropic       │ │ -ollama      │ │ -gemini      │
//!  └──────┬───────┘ └────────┬─────────┘ └──────┬───────┘ └──────┬───────┘
//!         └──────────────────┴───────┬──────────┴────────────────┘
//!                                    ▼
//!              ┌─────────────────────────────────────────┐
//!              │                chatwire                 │
//!              │ (Chat typestate, Adapter, Transport,    │
//!              │  ToolRegistry, LlmError)                │
//!              └─────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chat`] | Messages, tool calls and results, turns, model descriptors |
//! | [`conversation`] | The typestate [`Chat`] builder and its state markers |
//! | [`adapter`] | The [`Adapter`] trait and the `send` / `list_models` helpers |
//! | [`transport`] | Request/response descriptors and shared status handling |
//! | [`tool`] | Tool handlers, the registry, and the `step` round trip |
//! | [`error`] | The unified [`LlmError`] |

#![warn(missing_docs)]

pub mod adapter;
pub mod chat;
pub mod conversation;
pub mod error;
pub mod tool;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

pub use adapter::{Adapter, list_models, send};
pub use chat::{Message, ModelInfo, ToolCall, ToolDefinition, ToolResult, Turn};
pub use conversation::{Chat, Empty, FreeText, JsonFormat, Ready, ToolsOff, ToolsOn};
pub use error::LlmError;
pub use tool::{Step, ToolError, ToolRegistry, step, tool_fn};
pub use transport::{HttpRequest, HttpResponse, Transport};
