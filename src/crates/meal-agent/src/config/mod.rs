//! Configuration management for meal-agent.
//!
//! Sources, later ones overriding earlier ones key by key:
//! 1. Built-in defaults
//! 2. User-level config: ~/.meal-agent/config.toml
//! 3. Project-level config: ./.meal-agent/config.toml
//! 4. An explicit file passed on the command line

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    AgentConfig, CatalogSettings, LlmProviderKind, LlmSettings, LoggingConfig, PipelineSettings,
};
