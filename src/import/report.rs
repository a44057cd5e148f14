//! Import outcome reporting

use serde::{Deserialize, Serialize};

/// What happened to the nonconformity sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NocOutcome {
    /// The profile maps no nonconformity sheet
    NotConfigured,
    /// Mapped but missing from the source; the import still succeeds
    SheetAbsent,
    /// Number of records read from the mapped sheet
    Imported(usize),
}

/// A row the store refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Sheet the row came from
    pub sheet: String,

    /// 1-based row number as shown in a spreadsheet, counting the header
    pub row: usize,

    pub message: String,
}

/// Everything one import run did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub source: String,
    pub profile: String,

    pub company: String,
    pub company_created: bool,

    pub project_code: String,
    pub project_name: String,
    pub project_created: bool,

    pub activities_imported: usize,
    /// Rows passed over: blank descriptions and header echoes
    pub rows_skipped: usize,
    pub row_errors: Vec<RowError>,

    pub nonconformities: NocOutcome,

    pub warnings: Vec<String>,

    pub total_activities: i64,
    pub completed_activities: i64,
    /// Project-wide completion after the post-import recompute
    pub global_progress: f64,
}

impl ImportReport {
    /// True when nothing needs operator attention
    pub fn clean(&self) -> bool {
        self.row_errors.is_empty() && self.warnings.is_empty()
    }
}
