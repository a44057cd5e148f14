//! Obra: construction project execution tracker
//!
//! Tracks projects, their activities and nonconformities in an embedded
//! SQLite store, ingests heterogeneous EDP spreadsheets through
//! configurable mapping profiles, and maintains derived per-project
//! progress summaries.

pub mod cli;
pub mod core;
pub mod entities;
pub mod import;
