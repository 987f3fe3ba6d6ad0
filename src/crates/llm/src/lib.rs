//! Chat model abstraction for meal-agent.
//!
//! This crate defines the provider-agnostic [`ChatModel`] trait used by the
//! recommendation pipeline, the request/response types that flow through it,
//! and a concrete client for OpenAI-compatible chat completion APIs.
//!
//! Two call shapes matter to the pipeline:
//!
//! - **Structured** calls carry a [`ResponseFormat::JsonSchema`] and expect
//!   the provider to return a JSON object conforming to that schema.
//! - **Free-text** calls carry no response format and return prose.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::{ChatModel, ChatRequest, Message, RemoteLlmConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = std::env::var("OPENAI_API_KEY")?;
//!     let config = RemoteLlmConfig::new(api_key, "https://api.openai.com/v1", "gpt-4o");
//!     let client = OpenAiClient::new(config)?;
//!
//!     let request = ChatRequest::new(vec![
//!         Message::system("Você é um assistente de refeições."),
//!         Message::human("Quero um prato vegano"),
//!     ])
//!     .with_temperature(0.2);
//!
//!     let response = client.chat(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod message;
pub mod remote;
pub mod traits;

pub use chat::{ChatConfig, ChatRequest, ChatResponse, ResponseFormat, UsageMetadata};
pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
pub use message::{Message, MessageRole};
pub use traits::ChatModel;
