//! Error types for the recommendation pipeline.

use thiserror::Error;

/// Result type alias for meal-agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Everything that can stop a turn (or the agent itself) from completing.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Missing credentials or unusable settings; raised at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Model output is not a JSON object.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// The decision names an action outside the catalog tools.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// The decision object violates the decision schema.
    #[error("invalid decision schema: {0}")]
    InvalidSchema(String),

    /// A catalog query could not run. Carried to the model as a failure result.
    #[error("execution error: {0}")]
    Execution(String),

    /// The model call itself failed.
    #[error("model call failed: {0}")]
    Transport(#[from] llm::LlmError),

    /// The model call did not finish in time.
    #[error("{stage} call timed out after {seconds}s")]
    Timeout { stage: &'static str, seconds: u64 },
}

impl AgentError {
    /// Failures caused by the content of the model's decision.
    pub fn is_decision_error(&self) -> bool {
        matches!(
            self,
            AgentError::MalformedResponse(_)
                | AgentError::InvalidAction(_)
                | AgentError::InvalidSchema(_)
        )
    }

    /// Failures of the model service (network, quota, timeouts).
    pub fn is_transport_error(&self) -> bool {
        matches!(self, AgentError::Transport(_) | AgentError::Timeout { .. })
    }
}

impl From<catalog::CatalogError> for AgentError {
    fn from(err: catalog::CatalogError) -> Self {
        AgentError::Execution(err.to_string())
    }
}
