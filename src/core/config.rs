//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::Workspace;

/// Obra configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default responsible username for imports
    pub responsible: Option<String>,

    /// Default mapping profile for imports (name or YAML path)
    pub default_profile: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/obra/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Workspace config (.obra/config.yaml)
        if let Ok(workspace) = Workspace::discover() {
            let workspace_config = workspace.config_path();
            if workspace_config.exists() {
                if let Ok(contents) = std::fs::read_to_string(&workspace_config) {
                    if let Ok(ws_config) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(ws_config);
                    }
                }
            }
        }

        // 4. Environment variables
        if let Ok(responsible) = std::env::var("OBRA_RESPONSIBLE") {
            config.responsible = Some(responsible);
        }
        if let Ok(profile) = std::env::var("OBRA_PROFILE") {
            config.default_profile = Some(profile);
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "obra")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.responsible.is_some() {
            self.responsible = other.responsible;
        }
        if other.default_profile.is_some() {
            self.default_profile = other.default_profile;
        }
    }
}
