//! `OpenAI` [`Adapter`] implementation.

use chatwire::conversation::{OutputFormat, ToolState};
use chatwire::transport::{check_status, join_url, parse_body};
use chatwire::{Adapter, Chat, HttpRequest, HttpResponse, LlmError, ModelInfo, Ready, Turn};
use tracing::{debug, instrument};

use crate::config::OpenAiConfig;
use crate::convert;
use crate::ext::OpenAiExt;
use crate::types::{ModelsResponse, Response};

/// Adapter for the `OpenAI` Responses API.
///
/// # Example
///
/// ```rust
/// use chatwire::Adapter;
/// use chatwire_openai::{OpenAiAdapter, OpenAiConfig};
///
/// let adapter = OpenAiAdapter::new(OpenAiConfig {
///     api_key: "sk-test".into(),
///     ..Default::default()
/// });
///
/// let request = adapter.encode(&adapter.new_chat("gpt-5").user("Hello!")).unwrap();
/// assert_eq!(request.url, "https://api.openai.com/v1/responses");
/// assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    config: OpenAiConfig,
}

impl OpenAiAdapter {
    /// Create a new `OpenAI` adapter from configuration.
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    /// The adapter's configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            "authorization".into(),
            format!("Bearer {}", self.config.api_key),
        )];
        if let Some(org) = &self.config.organization {
            headers.push(("openai-organization".into(), org.clone()));
        }
        headers
    }
}

impl Adapter for OpenAiAdapter {
    type Ext = OpenAiExt;
    const NAME: &'static str = crate::PROVIDER;

    #[instrument(skip_all, fields(model = %chat.model(), messages = chat.messages().len()))]
    fn encode<T: ToolState, F: OutputFormat>(
        &self,
        chat: &Chat<OpenAiExt, Ready, T, F>,
    ) -> Result<HttpRequest, LlmError> {
        let url = join_url(&self.config.base_url, "/v1/responses")?;
        let request = convert::build_request(chat);
        let body = serde_json::to_string(&request)?;
        debug!(
            items = request.input.len(),
            continuing = request.previous_response_id.is_some(),
            "encoded openai request"
        );
        Ok(HttpRequest::post_json(
            url,
            self.default_headers(),
            body,
            chat.timeout_setting(),
        ))
    }

    #[instrument(skip_all, fields(status = %response.status))]
    fn decode(&self, ext: &OpenAiExt, response: &HttpResponse) -> Result<Turn<OpenAiExt>, LlmError> {
        check_status(Self::NAME, response, convert::error_message)?;
        let parsed: Response = parse_body(Self::NAME, &response.body)?;
        let turn = convert::convert_response(parsed, ext)?;
        debug!(
            tool_calls = turn.tool_calls.len(),
            stop_reason = ?turn.stop_reason,
            "decoded openai response"
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
