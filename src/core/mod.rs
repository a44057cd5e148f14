//! Core module - persistence, configuration, and progress rollups

pub mod config;
pub mod progress;
pub mod store;
pub mod workspace;

pub use config::Config;
pub use store::{ImportRecord, StatusCount, Store, StoreError};
pub use workspace::{Workspace, WorkspaceError};
