//! Unified error type for every adapter.
//!
//! Each provider maps its native failures into [`LlmError`], so callers
//! match against one closed set regardless of which backend produced the
//! response. The set is deliberately small:
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`Transport`](LlmError::Transport) | nothing came back (bad base URL, connection failure) |
//! | [`Http`](LlmError::Http) | non-200 status whose body is not a recognizable provider error |
//! | [`Decode`](LlmError::Decode) | a 200 body that does not match the provider's schema |
//! | [`Provider`](LlmError::Provider) | a structured provider error, or an invalid provider setting |
//! | [`Tool`](LlmError::Tool) | a tool handler failed during dispatch |
//! | [`RateLimited`](LlmError::RateLimited) | status 429 |
//!
//! ```rust
//! use chatwire::LlmError;
//!
//! fn backoff_secs(err: &LlmError) -> Option<u64> {
//!     match err {
//!         LlmError::RateLimited { retry_after } => Some(retry_after.unwrap_or(1)),
//!         _ => None,
//!     }
//! }
//! ```

use crate::tool::ToolError;

/// The error type returned by every builder, encode, decode, and dispatch
/// operation that can fail.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The request never produced a response.
    ///
    /// Adapters raise this only for malformed base addresses; transports
    /// use it for connection-level failures.
    #[error("transport error: {0}")]
    Transport(String),

    /// A non-200 response whose body could not be read as a provider error.
    #[error("HTTP error (status={status}): {body}")]
    Http {
        /// The status code the provider returned.
        status: http::StatusCode,
        /// The raw response body.
        body: String,
    },

    /// A response body was malformed or did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A structured error reported by (or about) a specific provider.
    #[error("{provider} error: {message}")]
    Provider {
        /// Provider name, e.g. `"anthropic"`.
        provider: String,
        /// The extracted error message.
        message: String,
        /// The raw body the message was extracted from. Empty for errors
        /// raised locally, such as an out-of-range thinking budget.
        raw: String,
    },

    /// A tool handler failed; the remaining calls of the batch were skipped.
    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    /// The provider answered with HTTP 429.
    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited {
        /// Seconds from the `retry-after` header, when present and numeric.
        retry_after: Option<u64>,
    },
}

impl LlmError {
    /// Builds a [`LlmError::Provider`] for a locally detected misconfiguration.
    ///
    /// ```rust
    /// use chatwire::LlmError;
    ///
    /// let err = LlmError::config("anthropic", "thinking budget must be at least 1024 tokens");
    /// assert!(err.to_string().contains("anthropic"));
    /// ```
    pub fn config(provider: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.to_owned(),
            message: message.into(),
            raw: String::new(),
        }
    }

    /// Returns `true` if sending the same request again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Transport(_) => true,
            Self::Http { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
