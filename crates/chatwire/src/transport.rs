//! Transport-boundary descriptors and the status handling every adapter shares.
//!
//! Adapters never open connections. They produce an [`HttpRequest`] and
//! consume an [`HttpResponse`]; whatever executes the request in between
//! is the caller's [`Transport`].

use std::future::Future;
use std::time::Duration;

use http::{Method, StatusCode, Uri};
use serde::de::DeserializeOwned;

use crate::error::LlmError;

/// Executes request descriptors. Supplied by the caller.
///
/// Uses native async-fn-in-traits, so implementations are plain
/// `async fn`s. A transport should return `Ok` for every response it
/// receives, whatever the status; status handling belongs to the adapter.
/// Failures before a response exists map to [`LlmError::Transport`].
///
/// ```rust
/// use chatwire::{HttpRequest, HttpResponse, LlmError, Transport};
///
/// struct Canned;
///
/// impl Transport for Canned {
///     async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, LlmError> {
///         Ok(HttpResponse::ok("{}"))
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Executes `request` and returns the raw response.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, LlmError>> + Send;
}

/// An outbound request, ready for a transport to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Header pairs in the order they should be sent.
    pub headers: Vec<(String, String)>,
    /// Request body. Empty for `GET`.
    pub body: String,
    /// Deadline the transport should honor, if any.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Builds a `POST` with a JSON body.
    ///
    /// `content-type: application/json` is appended after `headers`.
    pub fn post_json(
        url: String,
        mut headers: Vec<(String, String)>,
        body: String,
        timeout: Option<Duration>,
    ) -> Self {
        headers.push(("content-type".into(), "application/json".into()));
        Self {
            method: Method::POST,
            url,
            headers,
            body,
            timeout,
        }
    }

    /// Builds a bodiless `GET`.
    pub fn get(url: String, headers: Vec<(String, String)>) -> Self {
        Self {
            method: Method::GET,
            url,
            headers,
            body: String::new(),
            timeout: None,
        }
    }

    /// Returns the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response as received by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: StatusCode,
    /// Header pairs as received.
    pub headers: Vec<(String, String)>,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// A 200 response with the given body and no headers.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// A response with an arbitrary status and no headers.
    pub fn with_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Adds a header, builder style.
    #[must_use]
    pub fn header_pair(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Seconds from a numeric `retry-after` header.
    ///
    /// HTTP-date values and anything else that is not a non-negative
    /// integer yield `None`.
    pub fn retry_after(&self) -> Option<u64> {
        self.header("retry-after")?.trim().parse().ok()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Joins a configured base URL and an endpoint path.
///
/// The base must be an absolute `http` or `https` URL; anything else is a
/// [`LlmError::Transport`] since no request could ever be sent with it.
/// Trailing slashes on the base are ignored.
///
/// ```rust
/// use chatwire::transport::join_url;
///
/// assert_eq!(
///     join_url("https://api.example.com/", "/v1/messages").unwrap(),
///     "https://api.example.com/v1/messages"
/// );
/// assert!(join_url("not a url", "/v1/messages").is_err());
/// ```
pub fn join_url(base: &str, path: &str) -> Result<String, LlmError> {
    let base = base.trim_end_matches('/');
    let uri: Uri = base
        .parse()
        .map_err(|e| LlmError::Transport(format!("invalid base URL {base:?}: {e}")))?;
    match uri.scheme_str() {
        Some("http" | "https") => {}
        _ => {
            return Err(LlmError::Transport(format!(
                "invalid base URL {base:?}: expected an http or https URL"
            )));
        }
    }
    if uri.authority().is_none() {
        return Err(LlmError::Transport(format!(
            "invalid base URL {base:?}: missing host"
        )));
    }
    Ok(format!("{base}{path}"))
}

/// Applies the shared status branching to a provider response.
///
/// - `200` passes.
/// - `429` becomes [`LlmError::RateLimited`] with the `retry-after` seconds.
/// - Anything else becomes [`LlmError::Provider`] when `extract_message`
///   finds a structured error in the body, or [`LlmError::Http`] with the
///   raw body when it does not.
pub fn check_status(
    provider: &str,
    response: &HttpResponse,
    extract_message: impl FnOnce(&str) -> Option<String>,
) -> Result<(), LlmError> {
    if response.status == StatusCode::OK {
        return Ok(());
    }
    if response.status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response.retry_after();
        tracing::debug!(provider, ?retry_after, "rate limited");
        return Err(LlmError::RateLimited { retry_after });
    }
    match extract_message(&response.body) {
        Some(message) => Err(LlmError::Provider {
            provider: provider.to_owned(),
            message,
            raw: response.body.clone(),
        }),
        None => Err(LlmError::Http {
            status: response.status,
            body: response.body.clone(),
        }),
    }
}

/// Parses a success body into the provider's response type.
pub fn parse_body<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T, LlmError> {
    serde_json::from_str(body)
        .map_err(|e| LlmError::Decode(format!("failed to parse {provider} response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_structured_error(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_post_json_appends_content_type() {
        let req = HttpRequest::post_json(
            "https://x/y".into(),
            vec![("x-api-key".into(), "k".into())],
            "{}".into(),
            Some(Duration::from_secs(3)),
        );
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.headers[0].0, "x-api-key");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_get_has_empty_body() {
        let req = HttpRequest::get("https://x/models".into(), Vec::new());
        assert_eq!(req.method, Method::GET);
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_join_url_variants() {
        assert_eq!(
            join_url("http://localhost:11434", "/api/chat").unwrap(),
            "http://localhost:11434/api/chat"
        );
        assert_eq!(
            join_url("https://proxy.example.com/base/", "/v1/responses").unwrap(),
            "https://proxy.example.com/base/v1/responses"
        );
    }

    #[test]
    fn test_join_url_rejects_malformed() {
        for bad in ["", "api.example.com", "ftp://example.com", "http://exa mple.com"] {
            assert!(
                matches!(join_url(bad, "/v1"), Err(LlmError::Transport(_))),
                "expected Transport error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_check_status_ok() {
        let resp = HttpResponse::ok("{}");
        assert!(check_status("test", &resp, no_structured_error).is_ok());
    }

    #[test]
    fn test_rate_limited_with_retry_after() {
        let resp = HttpResponse::with_status(StatusCode::TOO_MANY_REQUESTS, "slow down")
            .header_pair("Retry-After", "30");
        let err = check_status("test", &resp, no_structured_error).unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { retry_after: Some(30) }));
    }

    #[test]
    fn test_rate_limited_header_case_insensitive() {
        let resp = HttpResponse::with_status(StatusCode::TOO_MANY_REQUESTS, "")
            .header_pair("x-request-id", "abc")
            .header_pair("RETRY-AFTER", " 7 ");
        assert_eq!(resp.retry_after(), Some(7));
    }

    #[test]
    fn test_rate_limited_without_header() {
        let resp = HttpResponse::with_status(StatusCode::TOO_MANY_REQUESTS, "");
        let err = check_status("test", &resp, no_structured_error).unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { retry_after: None }));
    }

    #[test]
    fn test_rate_limited_non_numeric_header() {
        let resp = HttpResponse::with_status(StatusCode::TOO_MANY_REQUESTS, "")
            .header_pair("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(resp.retry_after(), None);
    }

    #[test]
    fn test_structured_error_becomes_provider() {
        let resp = HttpResponse::with_status(StatusCode::BAD_REQUEST, r#"{"msg":"bad"}"#);
        let err = check_status("test", &resp, |_| Some("bad".into())).unwrap_err();
        assert!(matches!(
            err,
            LlmError::Provider { ref provider, ref message, ref raw }
                if provider == "test" && message == "bad" && raw == r#"{"msg":"bad"}"#
        ));
    }

    #[test]
    fn test_unstructured_error_falls_back_to_http() {
        let resp = HttpResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        let err = check_status("test", &resp, no_structured_error).unwrap_err();
        assert!(matches!(
            err,
            LlmError::Http { status, ref body } if status == StatusCode::INTERNAL_SERVER_ERROR && body == "oops"
        ));
    }

    #[test]
    fn test_non_200_success_codes_are_not_accepted() {
        let resp = HttpResponse::with_status(StatusCode::CREATED, "{}");
        assert!(check_status("test", &resp, no_structured_error).is_err());
    }

    #[test]
    fn test_parse_body_decode_error() {
        let err = parse_body::<serde_json::Value>("test", "{").unwrap_err();
        assert!(matches!(err, LlmError::Decode(ref m) if m.contains("test")));
    }
}
