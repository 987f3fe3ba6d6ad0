//! Configuration schema for meal-agent

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AgentConfig {
    /// Language model configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Catalog data source
    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Pipeline behaviour
    #[serde(default)]
    pub agent: PipelineSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which chat model backs the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    /// OpenAI or any OpenAI-compatible endpoint.
    #[default]
    OpenAi,

    /// Built-in keyword model, no network access.
    Offline,
}

/// LLM provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProviderKind,

    /// Model name
    pub model: String,

    /// API key (supports ${VAR} interpolation)
    pub api_key: Option<String>,

    /// API base URL
    pub api_base: String,

    /// Organization header for OpenAI
    pub organization: Option<String>,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::OpenAi,
            model: "gpt-4o".to_string(),
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            organization: None,
            temperature: None,
            timeout_secs: 60,
        }
    }
}

/// Catalog data source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Path of the JSON catalog file
    pub path: PathBuf,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/catalogo.json"),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Upper bound for each model call, in seconds
    pub request_timeout_secs: u64,

    /// Require every search parameter key in decisions
    pub strict_schema: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            strict_schema: true,
        }
    }
}

impl PipelineSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,

    /// Log format: "compact", "pretty", "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl AgentConfig {
    /// Resolve environment variables in configuration values
    ///
    /// Supports ${VAR_NAME} syntax; an unset API key falls back to
    /// `OPENAI_API_KEY`.
    pub fn resolve_env_vars(&mut self) {
        self.llm.api_key = self
            .llm
            .api_key
            .as_deref()
            .map(Self::expand_env_var)
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()));

        self.llm.api_base = Self::expand_env_var(&self.llm.api_base);
    }

    /// Expand environment variable in a string
    fn expand_env_var(value: &str) -> String {
        if value.starts_with("${") && value.ends_with('}') {
            let var_name = &value[2..value.len() - 1];
            std::env::var(var_name).unwrap_or_else(|_| value.to_string())
        } else {
            value.to_string()
        }
    }
}
