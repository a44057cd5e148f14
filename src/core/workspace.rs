//! Workspace discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the database file inside `.obra/`
const DB_FILE: &str = "tracker.db";

/// Represents an obra workspace
#[derive(Debug)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .obra/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current =
            std::env::current_dir().map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        loop {
            let obra_dir = current.join(".obra");
            if obra_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new workspace at the given path
    pub fn init(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let obra_dir = root.join(".obra");
        if obra_dir.exists() {
            return Err(WorkspaceError::AlreadyExists(root.clone()));
        }

        Self::write_structure(&obra_dir)?;
        Ok(Self { root })
    }

    /// Initialize even if .obra/ exists, keeping any existing database
    pub fn init_force(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(&root.join(".obra"))?;
        Ok(Self { root })
    }

    fn write_structure(obra_dir: &Path) -> Result<(), WorkspaceError> {
        std::fs::create_dir_all(obra_dir).map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        let config_path = obra_dir.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        }

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# Obra Workspace Configuration
# Workspace settings override the global config in ~/.config/obra/

# Default responsible username for imports
# (falls back to the first active admin account)
# responsible: ""

# Default mapping profile for `obra import`
# (cover, consolidated, or a path to a profile YAML)
# default_profile: cover
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .obra configuration directory
    pub fn obra_dir(&self) -> PathBuf {
        self.root.join(".obra")
    }

    /// Get the path of the SQLite database
    pub fn db_path(&self) -> PathBuf {
        self.obra_dir().join(DB_FILE)
    }

    /// Get the path of the workspace config file
    pub fn config_path(&self) -> PathBuf {
        self.obra_dir().join("config.yaml")
    }
}

/// Errors that can occur during workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not an obra workspace (searched from {searched_from:?}). Run 'obra init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("obra workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
