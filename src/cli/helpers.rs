//! Shared helper functions for CLI commands

use chrono::NaiveDate;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::{Store, Workspace};
use crate::entities::{Person, Project};

/// Discover the workspace and open its store
pub fn open_store(global: &GlobalOpts) -> Result<(Workspace, Store)> {
    let workspace = match &global.workspace {
        Some(path) => Workspace::discover_from(path),
        None => Workspace::discover(),
    }
    .map_err(|e| miette::miette!("{}", e))?;

    let store = Store::open(&workspace.db_path()).map_err(|e| miette::miette!("{}", e))?;
    Ok((workspace, store))
}

/// Look up a project by code, failing with a readable message
pub fn require_project(store: &Store, code: &str) -> Result<Project> {
    store
        .find_project_by_code(code)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("No project with code '{}'", code))
}

/// Look up a person by username, failing with a readable message
pub fn require_person(store: &Store, username: &str) -> Result<Person> {
    store
        .find_person_by_username(username)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("No person with username '{}'", username))
}

/// Parse a date flag; ISO format only, spreadsheet leniency stays in the importer
pub fn parse_date_flag(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| miette::miette!("Invalid date '{}'. Use YYYY-MM-DD", value))
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render an optional date for table cells
pub fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}
