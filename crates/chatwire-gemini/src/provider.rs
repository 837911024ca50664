//! Gemini [`Adapter`] implementation.

use chatwire::conversation::{OutputFormat, ToolState};
use chatwire::transport::{check_status, join_url, parse_body};
use chatwire::{Adapter, Chat, HttpRequest, HttpResponse, LlmError, ModelInfo, Ready, Turn};
use tracing::{debug, instrument};

use crate::config::GeminiConfig;
use crate::convert;
use crate::ext::GeminiExt;
use crate::types::{ModelsResponse, Response};

/// Adapter for the Gemini `generateContent` API.
///
/// ```rust
/// use chatwire::Adapter;
/// use chatwire_gemini::{GeminiAdapter, GeminiConfig};
///
/// let adapter = GeminiAdapter::new(GeminiConfig {
///     api_key: "AIza-test".into(),
///     ..Default::default()
/// });
/// let request = adapter.encode(&adapter.new_chat("gemini-2.5-flash").user("Hi")).unwrap();
/// assert_eq!(
///     request.url,
///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    config: GeminiConfig,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter from configuration.
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    /// The adapter's configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn default_headers(&self) -> Vec<(String, String)> {
        vec![("x-goog-api-key".into(), self.config.api_key.clone())]
    }
}

impl Adapter for GeminiAdapter {
    type Ext = GeminiExt;
    const NAME: &'static str = crate::PROVIDER;

    #[instrument(skip_all, fields(model = %chat.model(), messages = chat.messages().len()))]
    fn encode<T: ToolState, F: OutputFormat>(
        &self,
        chat: &Chat<GeminiExt, Ready, T, F>,
    ) -> Result<HttpRequest, LlmError> {
        // Accept both "gemini-2.5-flash" and "models/gemini-2.5-flash".
        let model = chat.model().trim_start_matches("models/");
        let url = join_url(
            &self.config.base_url,
            &format!("/v1beta/models/{model}:generateContent"),
        )?;
        let body = serde_json::to_string(&convert::build_request(chat))?;
        debug!(bytes = body.len(), "encoded gemini request");
        Ok(HttpRequest::post_json(
            url,
            self.default_headers(),
            body,
            chat.timeout_setting(),
        ))
    }

    #[instrument(skip_all, fields(status = %response.status))]
    fn decode(&self, ext: &GeminiExt, response: &HttpResponse) -> Result<Turn<GeminiExt>, LlmError> {
        check_status(Self::NAME, response, convert::error_message)?;
        let parsed: Response = parse_body(Self::NAME, &response.body)?;
        let turn = convert::convert_response(parsed, ext);
        debug!(
            tool_calls = turn.tool_calls.len(),
            stop_reason = ?turn.stop_reason,
            "decoded gemini response"
        );
        Ok(turn)
    }

    fn list_models_request(&self) -> Result<HttpRequest, LlmError> {
        let url = join_url(&self.config.base_url, "/v1beta/models")?;
        Ok(HttpRequest::get(url, self.default_headers()))
    }

    fn decode_models(&self, response: &HttpResponse) -> Result<Vec<ModelInfo>, LlmError> {
        check_status(Self::NAME, response, convert::error_message)?;
        let parsed: ModelsResponse = parse_body(Self::NAME, &response.body)?;
        Ok(convert::convert_models(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwire::test_helpers::{rate_limited, two_tool_call_history};
    use http::StatusCode;

    fn adapter() -> GeminiAdapter {
        GeminiAdapter::new(GeminiConfig {
            api_key: "AIza-test".into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_headers() {
        let a = adapter();
        let req = a.encode(&a.new_chat("gemini-2.5-pro").user("Hi")).unwrap();
        let names: Vec<_> = req.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["x-goog-api-key", "content-type"]);
        assert_eq!(req.header("x-goog-api-key"), Some("AIza-test"));
    }

    #[test]
    fn test_model_prefix_accepted() {
        let a = adapter();
        let req = a
            .encode(&a.new_chat("models/gemini-2.5-pro").user("Hi"))
            .unwrap();
        assert!(req.url.ends_with("/v1beta/models/gemini-2.5-pro:generateContent"));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = adapter();
        let chat = two_tool_call_history(a.new_chat("gemini-2.5-pro").system("sys"));
        assert_eq!(a.encode(&chat).unwrap(), a.encode(&chat).unwrap());
    }

    #[test]
    fn test_malformed_base_url() {
        let a = GeminiAdapter::new(GeminiConfig {
            base_url: "generativelanguage.googleapis.com".into(),
            ..Default::default()
        });
        let err = a.encode(&a.new_chat("gemini").user("Hi")).unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)));
    }

    #[test]
    fn test_decode_rate_limited() {
        let err = adapter()
            .decode(
                &GeminiExt::default(),
                &rate_limited(Some(30)),
            )
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { retry_after: Some(30) }));
    }

    #[test]
    fn test_decode_provider_error() {
        let resp = HttpResponse::with_status(
            StatusCode::FORBIDDEN,
            r#"{"error":{"code":403,"message":"Permission denied","status":"PERMISSION_DENIED"}}"#,
        );
        let err = adapter().decode(&GeminiExt::default(), &resp).unwrap_err();
        assert!(matches!(
            err,
            LlmError::Provider { ref provider, ref message, .. }
                if provider == "gemini" && message == "PERMISSION_DENIED: Permission denied"
        ));
    }

    #[test]
    fn test_decode_missing_candidates_body_is_ok() {
        let turn = adapter()
            .decode(&GeminiExt::default(), &HttpResponse::ok("{}"))
            .unwrap();
        assert!(turn.text.is_empty());
        assert!(turn.tool_calls.is_empty());
    }
}
