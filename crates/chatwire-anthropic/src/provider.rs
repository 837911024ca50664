//! Anthropic [`Adapter`] implementation.

use chatwire::conversation::{OutputFormat, ToolState};
use chatwire::transport::{check_status, join_url, parse_body};
use chatwire::{Adapter, Chat, HttpRequest, HttpResponse, LlmError, ModelInfo, Ready, Turn};
use tracing::{debug, instrument};

use crate::config::AnthropicConfig;
use crate::convert;
use crate::ext::AnthropicExt;
use crate::types::{ModelsResponse, Response};

/// Adapter for the Anthropic Messages API.
///
/// Holds only configuration; conversation state lives in the [`Chat`].
///
/// # Example
///
/// ```rust
/// use chatwire::Adapter;
/// use chatwire_anthropic::{AnthropicAdapter, AnthropicConfig};
///
/// let adapter = AnthropicAdapter::new(AnthropicConfig {
///     api_key: "sk-ant-test".into(),
///     ..Default::default()
/// });
///
/// let chat = adapter.new_chat("claude-sonnet-4-20250514").user("Hello!");
/// let request = adapter.encode(&chat).unwrap();
/// assert_eq!(request.url, "https://api.anthropic.com/v1/messages");
/// assert_eq!(request.header("x-api-key"), Some("sk-ant-test"));
/// ```
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    config: AnthropicConfig,
}

impl AnthropicAdapter {
    /// Create a new Anthropic adapter from configuration.
    pub fn new(config: AnthropicConfig) -> Self {
        Self { config }
    }

    /// The adapter's configuration.
    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    /// Authentication and version headers shared by every endpoint.
    fn default_headers(&self) -> Vec<(String, String)> {
        vec![
            ("x-api-key".into(), self.config.api_key.clone()),
            ("anthropic-version".into(), self.config.api_version.clone()),
        ]
    }
}

impl Adapter for AnthropicAdapter {
    type Ext = AnthropicExt;
    const NAME: &'static str = crate::PROVIDER;

    #[instrument(skip_all, fields(model = %chat.model(), messages = chat.messages().len()))]
    fn encode<T: ToolState, F: OutputFormat>(
        &self,
        chat: &Chat<AnthropicExt, Ready, T, F>,
    ) -> Result<HttpRequest, LlmError> {
        let url = join_url(&self.config.base_url, "/v1/messages")?;
        let body = serde_json::to_string(&convert::build_request(chat, &self.config)?)?;

        let mut headers = self.default_headers();
        if let Some(beta) = convert::beta_header(chat.ext(), chat.output_schema().is_some()) {
            headers.push(("anthropic-beta".into(), beta));
        }

        debug!(bytes = body.len(), "encoded anthropic request");
        Ok(HttpRequest::post_json(
            url,
            headers,
            body,
            chat.timeout_setting(),
        ))
    }

    #[instrument(skip_all, fields(status = %response.status))]
    fn decode(
        &self,
        ext: &AnthropicExt,
        response: &HttpResponse,
    ) -> Result<Turn<AnthropicExt>, LlmError> {
        check_status(Self::NAME, response, convert::error_message)?;
        let parsed: Response = parse_body(Self::NAME, &response.body)?;
        let turn = convert::convert_response(parsed, ext)?;
        debug!(
            tool_calls = turn.tool_calls.len(),
            stop_reason = ?turn.stop_reason,
            "decoded anthropic response"
        );
        Ok(turn)
    }

    fn list_models_request(&self) -> Result<HttpRequest, LlmError> {
        let url = join_url(&self.config.base_url, "/v1/models")?;
        Ok(HttpRequest::get(url, self.default_headers()))
    }

    fn decode_models(&self, response: &HttpResponse) -> Result<Vec<ModelInfo>, LlmError> {
        check_status(Self::NAME, response, convert::error_message)?;
        let parsed: ModelsResponse = parse_body(Self::NAME, &response.body)?;
        Ok(convert::convert_models(parsed))
    }
}
