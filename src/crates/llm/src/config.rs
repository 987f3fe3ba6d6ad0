//! Connection settings for OpenAI-compatible endpoints.

use std::fmt;
use std::time::Duration;

/// Where and how to reach a chat completions API.
#[derive(Clone)]
pub struct RemoteLlmConfig {
    pub api_key: String,

    /// Base URL without the `/chat/completions` suffix,
    /// e.g. `https://api.openai.com/v1`.
    pub base_url: String,

    pub model: String,

    /// Whole-request HTTP timeout.
    pub timeout: Duration,

    /// Sent as `OpenAI-Organization` when set.
    pub organization: Option<String>,
}

impl fmt::Debug for RemoteLlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteLlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("organization", &self.organization)
            .finish()
    }
}

impl RemoteLlmConfig {
    /// Settings with the default 60s timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: default_timeout(),
            organization: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_config_builder() {
        let config = RemoteLlmConfig::new("test-key", "https://api.openai.com/v1", "gpt-4o")
            .with_timeout(Duration::from_secs(120))
            .with_organization("org-123");

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.organization, Some("org-123".to_string()));
    }

    #[test]
    fn test_default_timeout() {
        let config = RemoteLlmConfig::new("k", "https://api.openai.com/v1", "gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let config = RemoteLlmConfig::new("k", "https://api.openai.com/v1/", "gpt-4o");
        assert_eq!(
            config.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = RemoteLlmConfig::new("sk-secret", "https://api.openai.com/v1", "gpt-4o");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("gpt-4o"));
    }
}
