//! The adapter trait every provider crate implements.
//!
//! An adapter is a pair of pure functions around the caller's transport:
//!
//! ```text
//!  Chat ──encode──► HttpRequest ──Transport──► HttpResponse ──decode──► Turn
//!   ▲                                                                    │
//!   └───────────────────────── append_turn ◄─────────────────────────────┘
//! ```
//!
//! Adapters hold only configuration (credentials, base URL). Anything that
//! changes per conversation lives in the extension value carried by the
//! [`Chat`] and returned on every [`Turn`].

use std::fmt::Debug;

use tracing::instrument;

use crate::chat::{ModelInfo, Turn};
use crate::conversation::{Chat, OutputFormat, Ready, ToolState};
use crate::error::LlmError;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Encode/decode for one provider's wire format.
pub trait Adapter: Send + Sync {
    /// Provider-specific state threaded through `Chat` and `Turn`.
    type Ext: Clone + Debug + Default + Send + Sync;

    /// Provider name used in errors and logs, e.g. `"anthropic"`.
    const NAME: &'static str;

    /// Starts an empty chat for `model` with the default extension value.
    fn new_chat(&self, model: impl Into<String>) -> Chat<Self::Ext> {
        Chat::new(model, Self::Ext::default())
    }

    /// Serializes `chat` into the provider's request.
    ///
    /// Deterministic: the same chat always yields the same request. Fails
    /// only when the configured base URL is malformed.
    fn encode<T: ToolState, F: OutputFormat>(
        &self,
        chat: &Chat<Self::Ext, Ready, T, F>,
    ) -> Result<HttpRequest, LlmError>;

    /// Parses a response to a request built from a chat whose extension
    /// value was `ext`.
    fn decode(&self, ext: &Self::Ext, response: &HttpResponse)
    -> Result<Turn<Self::Ext>, LlmError>;

    /// Builds the model-listing request.
    fn list_models_request(&self) -> Result<HttpRequest, LlmError>;

    /// Parses the model-listing response.
    fn decode_models(&self, response: &HttpResponse) -> Result<Vec<ModelInfo>, LlmError>;
}

/// Encodes `chat`, executes it on `transport`, and decodes the turn.
///
/// The chat is not modified; fold the turn in with
/// [`Chat::append_turn`] or use [`step`](crate::tool::step) instead.
#[instrument(skip_all, fields(provider = A::NAME, model = %chat.model()))]
pub async fn send<A, R, T, F>(
    adapter: &A,
    transport: &R,
    chat: &Chat<A::Ext, Ready, T, F>,
) -> Result<Turn<A::Ext>, LlmError>
where
    A: Adapter,
    R: Transport,
    T: ToolState,
    F: OutputFormat,
{
    let request = adapter.encode(chat)?;
    let response = transport.send(request).await?;
    adapter.decode(chat.ext(), &response)
}

/// Lists the models available to the adapter's credentials.
#[instrument(skip_all, fields(provider = A::NAME))]
pub async fn list_models<A, R>(adapter: &A, transport: &R) -> Result<Vec<ModelInfo>, LlmError>
where
    A: Adapter,
    R: Transport,
{
    let request = adapter.list_models_request()?;
    let response = transport.send(request).await?;
    adapter.decode_models(&response)
}
