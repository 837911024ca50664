//! Anthropic adapter configuration.

/// Configuration for the Anthropic adapter.
///
/// Use struct update syntax with [`Default`] for ergonomic construction:
///
/// ```rust
/// use chatwire_anthropic::AnthropicConfig;
///
/// let config = AnthropicConfig {
///     api_key: "sk-ant-...".into(),
///     max_tokens: 1024,
///     ..Default::default()
/// };
/// ```
#[derive(Clone)]
pub struct AnthropicConfig {
    /// Anthropic API key, sent as `x-api-key`.
    pub api_key: String,
    /// Base URL for the API. Override for proxies or testing.
    pub base_url: String,
    /// Value of the `anthropic-version` header.
    pub api_version: String,
    /// Output token limit used when the chat sets none. The Messages API
    /// requires the field on every request.
    pub max_tokens: u32,
}

impl std::fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.anthropic.com".into(),
            api_version: "2023-06-01".into(),
            max_tokens: 4096,
        }
    }
}
