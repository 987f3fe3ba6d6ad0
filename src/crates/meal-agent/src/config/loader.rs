//! Configuration loader with layered sources
//!
//! Files are merged key by key, so a project file that only sets
//! `[catalog] path` keeps the user's `[llm]` settings.

use crate::config::schema::AgentConfig;
use crate::error::{AgentError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const CONFIG_DIR: &str = ".meal-agent";
const CONFIG_FILE: &str = "config.toml";

/// Configuration loader that handles user, project and explicit configs
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader for the standard locations
    pub fn new() -> Self {
        Self {
            user_config_path: dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE)),
            project_config_path: std::env::current_dir()
                .ok()
                .map(|cwd| cwd.join(CONFIG_DIR).join(CONFIG_FILE)),
        }
    }

    /// Create a loader for custom locations
    pub fn with_paths(user: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self {
            user_config_path: user,
            project_config_path: project,
        }
    }

    /// Load defaults, user and project configs
    pub async fn load(&self) -> Result<AgentConfig> {
        self.load_with_override(None).await
    }

    /// Load configuration with an optional explicit file on top
    ///
    /// Missing user/project files are skipped; a missing explicit file is an
    /// error.
    pub async fn load_with_override(&self, explicit: Option<&Path>) -> Result<AgentConfig> {
        let mut merged = toml::Value::try_from(AgentConfig::default())
            .map_err(|e| AgentError::Configuration(format!("Failed to encode defaults: {}", e)))?;

        for path in [&self.user_config_path, &self.project_config_path]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                debug!(path = %path.display(), "Config file not found, skipping");
                continue;
            }
            let layer = Self::read_layer(path).await?;
            debug!(path = %path.display(), "Loaded config layer");
            merge_toml(&mut merged, layer);
        }

        if let Some(path) = explicit {
            let layer = Self::read_layer(path).await?;
            debug!(path = %path.display(), "Loaded explicit config");
            merge_toml(&mut merged, layer);
        }

        let mut config = merged
            .try_into::<AgentConfig>()
            .map_err(|e| AgentError::Configuration(format!("Invalid configuration: {}", e)))?;

        config.resolve_env_vars();

        info!("Configuration loaded");
        Ok(config)
    }

    /// Read one TOML file
    async fn read_layer(path: &Path) -> Result<toml::Value> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            AgentError::Configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            AgentError::Configuration(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    pub fn user_config_path(&self) -> Option<&Path> {
        self.user_config_path.as_deref()
    }

    pub fn project_config_path(&self) -> Option<&Path> {
        self.project_config_path.as_deref()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlay `layer` onto `base`, recursing into tables.
fn merge_toml(base: &mut toml::Value, layer: toml::Value) {
    match (base, layer) {
        (toml::Value::Table(base_table), toml::Value::Table(layer_table)) => {
            for (key, value) in layer_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}
