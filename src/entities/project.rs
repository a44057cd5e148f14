//! Project entity type - a contracted scope of work keyed by code

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Finished,
    Suspended,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Planned
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Planned => write!(f, "planned"),
            ProjectStatus::InProgress => write!(f, "in_progress"),
            ProjectStatus::Finished => write!(f, "finished"),
            ProjectStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(ProjectStatus::Planned),
            "in_progress" => Ok(ProjectStatus::InProgress),
            "finished" => Ok(ProjectStatus::Finished),
            "suspended" => Ok(ProjectStatus::Suspended),
            _ => Err(format!(
                "Invalid project status: {}. Use planned, in_progress, finished, or suspended",
                s
            )),
        }
    }
}

/// A project record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Row id
    pub id: i64,

    /// Unique project code (e.g. "EDP001")
    pub code: String,

    /// Display name
    pub name: String,

    /// Owning company
    pub company_id: i64,

    /// Responsible person; nulled if the person is removed
    pub responsible_id: Option<i64>,

    /// Site supervisor, free text
    pub supervisor: Option<String>,

    /// Contract start date
    pub start_date: NaiveDate,

    /// Contract end date
    pub end_date: Option<NaiveDate>,

    /// Lifecycle status
    pub status: ProjectStatus,
}

/// Fields for inserting a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub code: String,
    pub name: String,
    pub company_id: i64,
    pub responsible_id: Option<i64>,
    pub supervisor: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_status_from_str() {
        assert_eq!(
            "planned".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::Planned
        );
        assert_eq!(
            "IN_PROGRESS".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::InProgress
        );
        assert!("done".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_project_status_display_roundtrip() {
        for status in [
            ProjectStatus::Planned,
            ProjectStatus::InProgress,
            ProjectStatus::Finished,
            ProjectStatus::Suspended,
        ] {
            assert_eq!(status.to_string().parse::<ProjectStatus>().unwrap(), status);
        }
    }
}
