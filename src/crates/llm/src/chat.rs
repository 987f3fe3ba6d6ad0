//! Request and response types for chat model calls.

use crate::message::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A request to a chat model containing messages and configuration.
///
/// # Example
///
/// ```rust,ignore
/// use llm::{ChatRequest, Message, ResponseFormat};
///
/// let request = ChatRequest::new(vec![
///     Message::system("Classify the request"),
///     Message::human("Quero o prato mais barato"),
/// ])
/// .with_temperature(0.0)
/// .with_response_format(ResponseFormat::json_schema("decision", schema));
/// ```
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The conversation messages to send to the model.
    pub messages: Vec<Message>,

    /// Generation configuration.
    pub config: ChatConfig,
}

impl ChatRequest {
    /// Create a new chat request with default configuration.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Constrain the output format.
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.config.response_format = Some(format);
        self
    }

    /// Whether this request asks for schema-constrained output.
    pub fn is_structured(&self) -> bool {
        matches!(
            self.config.response_format,
            Some(ResponseFormat::JsonSchema { .. }) | Some(ResponseFormat::JsonObject)
        )
    }

    /// Content of the last human message, if any.
    pub fn last_human_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::message::MessageRole::Human)
            .map(|m| m.text())
    }
}

/// Configuration parameters for chat generation.
#[derive(Debug, Clone, Default)]
pub struct ChatConfig {
    /// Sampling temperature (0.0-2.0, provider-dependent).
    pub temperature: Option<f32>,

    /// Output constraint. `None` means free text.
    pub response_format: Option<ResponseFormat>,
}

/// Output constraint for a chat request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Any JSON object.
    JsonObject,

    /// A JSON object matching `schema`.
    JsonSchema {
        /// Schema name reported to the provider
        name: String,
        /// JSON Schema document
        schema: Value,
        /// Ask the provider to enforce the schema exactly
        strict: bool,
    },
}

impl ResponseFormat {
    /// Strict JSON schema format.
    pub fn json_schema(name: impl Into<String>, schema: Value) -> Self {
        Self::JsonSchema {
            name: name.into(),
            schema,
            strict: true,
        }
    }

    /// OpenAI `response_format` payload.
    pub fn to_openai_value(&self) -> Value {
        match self {
            ResponseFormat::JsonObject => serde_json::json!({ "type": "json_object" }),
            ResponseFormat::JsonSchema {
                name,
                schema,
                strict,
            } => serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": name,
                    "strict": strict,
                    "schema": schema,
                }
            }),
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Prompt tokens
    pub input_tokens: usize,
    /// Completion tokens
    pub output_tokens: usize,
}

impl UsageMetadata {
    /// Create usage metadata.
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens consumed.
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// A complete response from a chat model.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The assistant message.
    pub message: Message,

    /// Token usage, when reported.
    pub usage: Option<UsageMetadata>,

    /// Provider-specific metadata (model, finish reason, ...).
    pub metadata: HashMap<String, Value>,
}

impl ChatResponse {
    /// Build a response around assistant text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            message: Message::assistant(text),
            usage: None,
            metadata: HashMap::new(),
        }
    }

    /// Assistant text.
    pub fn text(&self) -> &str {
        self.message.text()
    }
}
