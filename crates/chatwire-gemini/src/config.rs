//! Gemini adapter configuration.

/// Configuration for the Gemini adapter.
///
/// ```rust
/// use chatwire_gemini::GeminiConfig;
///
/// let config = GeminiConfig {
///     api_key: "AIza...".into(),
///     ..Default::default()
/// };
/// assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
/// ```
#[derive(Clone)]
pub struct GeminiConfig {
    /// Gemini API key, sent as `x-goog-api-key`.
    pub api_key: String,
    /// Base URL for the API, without the version segment.
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GeminiConfig {
            api_key: "AIza-secret".into(),
            ..Default::default()
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("AIza-secret"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
