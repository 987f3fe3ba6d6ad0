//! Remote chat model providers.
//!
//! - **OpenAI** - OpenAI models and any endpoint speaking the same
//!   `/chat/completions` dialect (OpenRouter, LM Studio, vLLM, ...)

pub mod openai;

pub use openai::OpenAiClient;
