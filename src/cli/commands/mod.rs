//! Command implementations

pub mod activity;
pub mod company;
pub mod completions;
pub mod import;
pub mod init;
pub mod noc;
pub mod person;
pub mod project;
pub mod recompute;
pub mod report;
pub mod status;
