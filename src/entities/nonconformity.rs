//! NonConformity entity type - quality findings raised against a project

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nonconformity workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NocStatus {
    Open,
    InProcess,
    Closed,
}

impl Default for NocStatus {
    fn default() -> Self {
        NocStatus::Open
    }
}

impl std::fmt::Display for NocStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NocStatus::Open => write!(f, "open"),
            NocStatus::InProcess => write!(f, "in_process"),
            NocStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for NocStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(NocStatus::Open),
            "in_process" => Ok(NocStatus::InProcess),
            "closed" => Ok(NocStatus::Closed),
            _ => Err(format!(
                "Invalid nonconformity status: {}. Use open, in_process, or closed",
                s
            )),
        }
    }
}

impl NocStatus {
    /// Derive a status from imported cells.
    ///
    /// A closure date always wins; otherwise the raw status text is checked
    /// against the source documents' "en proceso" marker, case-insensitively.
    pub fn derive(closure_date: Option<NaiveDate>, raw_status: Option<&str>) -> Self {
        if closure_date.is_some() {
            NocStatus::Closed
        } else if raw_status
            .map(|s| s.trim().to_lowercase() == "en proceso")
            .unwrap_or(false)
        {
            NocStatus::InProcess
        } else {
            NocStatus::Open
        }
    }
}

/// A nonconformity record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonConformity {
    /// Row id
    pub id: i64,

    /// Owning project
    pub project_id: i64,

    /// Report code (e.g. "NOC-3")
    pub code: String,

    /// What was found
    pub description: String,

    /// Root cause analysis
    pub root_cause: Option<String>,

    /// Corrective action taken or planned
    pub corrective_action: Option<String>,

    /// Responsible person; nulled if the person is removed
    pub responsible_id: Option<i64>,

    /// Date the issue was detected
    pub detected_date: NaiveDate,

    /// Date the issue was closed out
    pub closure_date: Option<NaiveDate>,

    /// Workflow status
    pub status: NocStatus,
}

/// Fields for inserting a nonconformity
#[derive(Debug, Clone)]
pub struct NewNonConformity {
    pub project_id: i64,
    pub code: String,
    pub description: String,
    pub root_cause: Option<String>,
    pub corrective_action: Option<String>,
    pub responsible_id: Option<i64>,
    pub detected_date: NaiveDate,
    pub closure_date: Option<NaiveDate>,
    pub status: NocStatus,
}
