//! Core trait for chat model integration.

use crate::chat::{ChatRequest, ChatResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Provider-agnostic interface for chat-based language models.
///
/// Implementations convert the request into their provider's wire format,
/// make the call, and convert the reply back. When the request carries a
/// [`ResponseFormat`](crate::ResponseFormat), the returned message text is
/// expected to be the JSON document produced under that constraint.
///
/// Implementations must be `Send + Sync`; share them as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete chat response.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Model identifier used for logging.
    fn model_name(&self) -> &str;
}
