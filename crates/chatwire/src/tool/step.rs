//! One-exchange stepping for the tool-call round trip.
//!
//! ```text
//!   step(chat) ──► Done { chat, turn }                      no tool calls: finished
//!            └──► ToolCall { chat, turn, calls }            caller supplies results,
//!                     │                                       then steps again
//!                     └─ registry.resolve(step) / step.with_results(results)
//! ```
//!
//! There is no iteration cap; a model that keeps calling tools keeps
//! producing `ToolCall` steps.

use tracing::instrument;

use super::ToolRegistry;
use crate::adapter::{Adapter, send};
use crate::chat::{ToolCall, ToolResult, Turn};
use crate::conversation::{Chat, OutputFormat, Ready, ToolState, ToolsOn};
use crate::error::LlmError;
use crate::transport::Transport;

/// The outcome of [`step`].
#[derive(Debug, Clone)]
pub enum Step<X, T, F> {
    /// The model answered without tool calls.
    Done {
        /// The chat with the turn folded in.
        chat: Chat<X, Ready, T, F>,
        /// The decoded turn.
        turn: Turn<X>,
    },
    /// The model requested tool calls; results must be supplied before
    /// stepping again.
    ToolCall {
        /// The chat with the turn folded in.
        chat: Chat<X, Ready, T, F>,
        /// The decoded turn.
        turn: Turn<X>,
        /// The requested calls, in emission order.
        calls: Vec<ToolCall>,
    },
}

impl<X, T, F> Step<X, T, F> {
    /// Returns `true` for [`Step::Done`].
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    /// The updated chat.
    pub fn chat(&self) -> &Chat<X, Ready, T, F> {
        match self {
            Self::Done { chat, .. } | Self::ToolCall { chat, .. } => chat,
        }
    }

    /// The decoded turn.
    pub fn turn(&self) -> &Turn<X> {
        match self {
            Self::Done { turn, .. } | Self::ToolCall { turn, .. } => turn,
        }
    }

    /// Consumes the step, returning the updated chat.
    pub fn into_chat(self) -> Chat<X, Ready, T, F> {
        match self {
            Self::Done { chat, .. } | Self::ToolCall { chat, .. } => chat,
        }
    }
}

impl<X, F> Step<X, ToolsOn, F> {
    /// Folds precomputed `results` into the chat, ready for the next step.
    ///
    /// For [`Step::Done`] the results are ignored and the chat returned as is.
    pub fn with_results(
        self,
        results: impl IntoIterator<Item = ToolResult>,
    ) -> Chat<X, Ready, ToolsOn, F> {
        match self {
            Self::Done { chat, .. } => chat,
            Self::ToolCall { chat, .. } => chat.with_tool_results(results),
        }
    }
}

impl ToolRegistry {
    /// Dispatches the calls of a [`Step::ToolCall`] and folds the results in.
    ///
    /// A [`Step::Done`] is returned unchanged as its chat. A handler failure
    /// aborts the batch and nothing is folded in.
    pub async fn resolve<X, F>(
        &self,
        step: Step<X, ToolsOn, F>,
    ) -> Result<Chat<X, Ready, ToolsOn, F>, LlmError> {
        match step {
            Step::Done { chat, .. } => Ok(chat),
            Step::ToolCall { chat, calls, .. } => {
                let results = self.dispatch(&calls).await?;
                Ok(chat.with_tool_results(results))
            }
        }
    }
}

/// Sends `chat` once and classifies the outcome.
///
/// The decoded turn is always folded into the returned chat, so the next
/// call only needs the tool results appended.
#[instrument(skip_all, fields(provider = A::NAME, model = %chat.model()))]
pub async fn step<A, R, T, F>(
    adapter: &A,
    transport: &R,
    chat: Chat<A::Ext, Ready, T, F>,
) -> Result<Step<A::Ext, T, F>, LlmError>
where
    A: Adapter,
    R: Transport,
    T: ToolState,
    F: OutputFormat,
{
    let turn = send(adapter, transport, &chat).await?;
    let chat = chat.append_turn(turn.clone());
    if turn.tool_calls.is_empty() {
        tracing::debug!("turn finished without tool calls");
        Ok(Step::Done { chat, turn })
    } else {
        tracing::debug!(calls = turn.tool_calls.len(), "turn requested tool calls");
        let calls = turn.tool_calls.clone();
        Ok(Step::ToolCall { chat, turn, calls })
    }
}
