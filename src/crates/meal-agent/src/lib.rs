//! Meal recommendation agent.
//!
//! Turns a free-text meal request into a catalog query with the help of a
//! chat model, then asks the model to phrase the answer:
//!
//! 1. The model classifies the request into an [`Action`] with structured
//!    search parameters (strict JSON schema).
//! 2. [`DecisionParser`] re-validates that object.
//! 3. The action runs against the shared [`catalog::Catalog`].
//! 4. An empty search is retried once with a relaxed filter.
//! 5. The model turns the [`FunctionResult`] into a friendly reply.
//!
//! [`MealAgent::chat`] never fails; errors become apologies in Portuguese.
//!
//! # Example
//!
//! ```rust,ignore
//! use meal_agent::{ConfigLoader, MealAgent};
//!
//! let config = ConfigLoader::new().load().await?;
//! let agent = MealAgent::from_config(&config)?;
//! println!("{}", agent.chat("Pratos veganos de até R$40").await);
//! ```

pub mod agent;
pub mod config;
pub mod decision;
pub mod error;
pub mod logging;
pub mod offline;
pub mod prompt;
pub mod relax;
pub mod result;

pub use agent::{AgentMode, MealAgent, PipelineState, TurnReport};
pub use config::{AgentConfig, ConfigLoader, LlmProviderKind};
pub use decision::{Action, Decision, DecisionParser, SearchParams};
pub use error::{AgentError, Result};
pub use offline::OfflineChatModel;
pub use relax::{relax, relaxed_retry, BUDGET_HEADROOM};
pub use result::{execute, FunctionResult};
