//! Tool error types.

/// Why a tool call could not produce a result.
///
/// Raised by [`ToolRegistry::dispatch`](super::ToolRegistry::dispatch) and
/// surfaced to callers wrapped in [`LlmError::Tool`](crate::LlmError::Tool).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// No handler is registered under this name.
    #[error("unknown tool: {0}")]
    NotFound(String),

    /// The arguments did not decode into the handler's argument type.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The handler ran and reported a failure.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Shorthand for [`ToolError::ExecutionFailed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed(message.into())
    }
}
