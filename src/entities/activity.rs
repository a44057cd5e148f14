//! Activity entity type - a line of work inside a project

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Activity workflow status
///
/// The importer only ever assigns `Pending`, `InProgress`, or `Completed`;
/// `Delayed` is reachable through manual edits alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Pending,
    InProgress,
    Completed,
    Delayed,
}

impl Default for ActivityStatus {
    fn default() -> Self {
        ActivityStatus::Pending
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityStatus::Pending => write!(f, "pending"),
            ActivityStatus::InProgress => write!(f, "in_progress"),
            ActivityStatus::Completed => write!(f, "completed"),
            ActivityStatus::Delayed => write!(f, "delayed"),
        }
    }
}

impl std::str::FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ActivityStatus::Pending),
            "in_progress" => Ok(ActivityStatus::InProgress),
            "completed" => Ok(ActivityStatus::Completed),
            "delayed" => Ok(ActivityStatus::Delayed),
            _ => Err(format!(
                "Invalid activity status: {}. Use pending, in_progress, completed, or delayed",
                s
            )),
        }
    }
}

impl ActivityStatus {
    /// Derive a status from a completion percentage
    pub fn from_progress(progress: f64) -> Self {
        if progress >= 100.0 {
            ActivityStatus::Completed
        } else if progress > 0.0 {
            ActivityStatus::InProgress
        } else {
            ActivityStatus::Pending
        }
    }
}

/// An activity record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Row id
    pub id: i64,

    /// Owning project
    pub project_id: i64,

    /// Item code from the source document, at most 20 characters
    pub item: Option<String>,

    /// What the activity is
    pub description: String,

    /// Responsible person; nulled if the person is removed
    pub responsible_id: Option<i64>,

    /// Planned completion date
    pub planned_date: Option<NaiveDate>,

    /// Actual completion date
    pub actual_date: Option<NaiveDate>,

    /// Completion percentage, 0-100 with two decimal places
    pub progress: f64,

    /// Free-text notes
    pub notes: Option<String>,

    /// Workflow status
    pub status: ActivityStatus,
}

/// Fields for inserting an activity
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub project_id: i64,
    pub item: Option<String>,
    pub description: String,
    pub responsible_id: Option<i64>,
    pub planned_date: Option<NaiveDate>,
    pub actual_date: Option<NaiveDate>,
    pub progress: f64,
    pub notes: Option<String>,
    pub status: ActivityStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_progress() {
        assert_eq!(ActivityStatus::from_progress(0.0), ActivityStatus::Pending);
        assert_eq!(
            ActivityStatus::from_progress(0.01),
            ActivityStatus::InProgress
        );
        assert_eq!(
            ActivityStatus::from_progress(99.99),
            ActivityStatus::InProgress
        );
        assert_eq!(
            ActivityStatus::from_progress(100.0),
            ActivityStatus::Completed
        );
        assert_eq!(
            ActivityStatus::from_progress(120.0),
            ActivityStatus::Completed
        );
    }

    #[test]
    fn test_delayed_only_parses_explicitly() {
        assert_eq!(
            "delayed".parse::<ActivityStatus>().unwrap(),
            ActivityStatus::Delayed
        );
        // No percentage maps to delayed
        for pct in [0.0, 50.0, 100.0] {
            assert_ne!(ActivityStatus::from_progress(pct), ActivityStatus::Delayed);
        }
    }
}
