//! `OpenAI` adapter configuration.

/// Configuration for the `OpenAI` adapter.
///
/// Use struct update syntax with [`Default`] for ergonomic construction:
///
/// ```rust
/// use chatwire_openai::OpenAiConfig;
///
/// let config = OpenAiConfig {
///     api_key: "sk-...".into(),
///     organization: Some("org-123".into()),
///     ..Default::default()
/// };
/// ```
#[derive(Clone)]
pub struct OpenAiConfig {
    /// `OpenAI` API key, sent as a bearer token.
    pub api_key: String,
    /// Base URL for the API, without the `/v1` suffix. Override for proxies
    /// or compatible servers.
    pub base_url: String,
    /// Optional organization ID, sent as `openai-organization`.
    pub organization: Option<String>,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .finish()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".into(),
            organization: None,
        }
    }
}
