//! Ollama adapter configuration.

/// Configuration for the Ollama adapter.
///
/// Use struct update syntax with [`Default`] for ergonomic construction:
///
/// ```rust
/// use chatwire_ollama::OllamaConfig;
///
/// let config = OllamaConfig {
///     keep_alive: Some("10m".into()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API. Defaults to `http://localhost:11434`.
    pub base_url: String,
    /// How long the server keeps the model loaded after a request
    /// (e.g. `"5m"`, `"0"`). `None` uses the server default.
    pub keep_alive: Option<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            keep_alive: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert!(config.keep_alive.is_none());
    }

    #[test]
    fn test_config_override() {
        let config = OllamaConfig {
            base_url: "http://remote:11434".into(),
            ..Default::default()
        };
        assert_eq!(config.base_url, "http://remote:11434");
    }
}
