//! Ollama [`Adapter`] implementation.

use chatwire::conversation::{OutputFormat, ToolState};
use chatwire::transport::{check_status, join_url, parse_body};
use chatwire::{Adapter, Chat, HttpRequest, HttpResponse, LlmError, ModelInfo, Ready, Turn};
use tracing::{debug, instrument};

use crate::config::OllamaConfig;
use crate::convert;
use crate::ext::OllamaExt;
use crate::types::{Response, TagsResponse};

/// Adapter for a local Ollama server.
///
/// No authentication is sent.
///
/// ```rust
/// use chatwire::Adapter;
/// use chatwire_ollama::{OllamaAdapter, OllamaConfig};
///
/// let adapter = OllamaAdapter::new(OllamaConfig::default());
/// let request = adapter.encode(&adapter.new_chat("llama3.2").user("Hi")).unwrap();
/// assert_eq!(request.url, "http://localhost:11434/api/chat");
/// ```
#[derive(Debug, Clone)]
pub struct OllamaAdapter {
    config: OllamaConfig,
}

impl OllamaAdapter {
    /// Create a new Ollama adapter from configuration.
    pub fn new(config: OllamaConfig) -> Self {
        Self { config }
    }

    /// The adapter's configuration.
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

impl Default for OllamaAdapter {
    fn default() -> Self {
        Self::new(OllamaConfig::default())
    }
}

impl Adapter for OllamaAdapter {
    type Ext = OllamaExt;
    const NAME: &'static str = crate::PROVIDER;

    #[instrument(skip_all, fields(model = %chat.model(), messages = chat.messages().len()))]
    fn encode<T: ToolState, F: OutputFormat>(
        &self,
        chat: &Chat<OllamaExt, Ready, T, F>,
    ) -> Result<HttpRequest, LlmError> {
        let url = join_url(&self.config.base_url, "/api/chat")?;
        let body = serde_json::to_string(&convert::build_request(chat, &self.config))?;
        debug!(bytes = body.len(), "encoded ollama request");
        Ok(HttpRequest::post_json(
            url,
            Vec::new(),
            body,
            chat.timeout_setting(),
        ))
    }

    #[instrument(skip_all, fields(status = %response.status))]
    fn decode(&self, ext: &OllamaExt, response: &HttpResponse) -> Result<Turn<OllamaExt>, LlmError> {
        check_status(Self::NAME, response, convert::error_message)?;
        let parsed: Response = parse_body(Self::NAME, &response.body)?;
        let turn = convert::convert_response(parsed, ext)?;
        debug!(
            tool_calls = turn.tool_calls.len(),
            stop_reason = ?turn.stop_reason,
            "decoded ollama response"
        );
        Ok(turn)
    }

    fn list_models_request(&self) -> Result<HttpRequest, LlmError> {
        let url = join_url(&self.config.base_url, "/api/tags")?;
        Ok(HttpRequest::get(url, Vec::new()))
    }

    fn decode_models(&self, response: &HttpResponse) -> Result<Vec<ModelInfo>, LlmError> {
        check_status(Self::NAME, response, convert::error_message)?;
        let parsed: TagsResponse = parse_body(Self::NAME, &response.body)?;
        Ok(convert::convert_models(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwire::test_helpers::{rate_limited, two_tool_call_history};
    use http::StatusCode;

    #[test]
    fn test_no_auth_headers() {
        let a = OllamaAdapter::default();
        let req = a.encode(&a.new_chat("llama3.2").user("Hi")).unwrap();
        assert_eq!(
            req.headers,
            vec![("content-type".to_owned(), "application/json".to_owned())]
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = OllamaAdapter::default();
        let chat = two_tool_call_history(a.new_chat("llama3.2"));
        assert_eq!(a.encode(&chat).unwrap(), a.encode(&chat).unwrap());
    }

    #[test]
    fn test_malformed_base_url() {
        let a = OllamaAdapter::new(OllamaConfig {
            base_url: "localhost:11434".into(),
            ..Default::default()
        });
        assert!(matches!(
            a.encode(&a.new_chat("llama3.2").user("Hi")),
            Err(LlmError::Transport(_))
        ));
        assert!(matches!(a.list_models_request(), Err(LlmError::Transport(_))));
    }

    #[test]
    fn test_decode_rate_limited() {
        let err = OllamaAdapter::default()
            .decode(&OllamaExt::default(), &rate_limited(Some(30)))
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { retry_after: Some(30) }));
    }

    #[test]
    fn test_decode_model_not_found() {
        let resp = HttpResponse::with_status(
            StatusCode::NOT_FOUND,
            r#"{"error":"model \"llama9\" not found, try pulling it first"}"#,
        );
        let err = OllamaAdapter::default()
            .decode(&OllamaExt::default(), &resp)
            .unwrap_err();
        assert!(matches!(
            err,
            LlmError::Provider { ref provider, ref message, .. }
                if provider == "ollama" && message.contains("try pulling")
        ));
    }
}
