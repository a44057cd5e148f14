//! Mapping profiles - which sheets and columns mean what
//!
//! The two source layouts in circulation disagree on almost everything:
//! sheet structure, column names, how progress is recorded. A profile
//! captures one layout as explicit configuration so the pipeline itself
//! stays free of hard-coded column names. Column candidates are plain
//! lists, never discovered by scanning headers at runtime.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors resolving or loading a profile
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Could not read profile {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid profile {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yml::Error,
    },

    #[error("Unknown profile: {0}. Use cover, consolidated, or a path to a profile YAML")]
    Unknown(String),
}

/// Cover-sheet cells that identify the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverMapping {
    /// Sheet whose first data row holds the header cells
    pub sheet: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_code_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor_column: Option<String>,
}

/// A labeled extra column folded into activity notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteColumn {
    pub column: String,

    /// Rendered as "label: value"; bare value when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Activity-sheet columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMapping {
    /// Sheet holding activity rows; the source's first sheet when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_column: Option<String>,

    /// Candidate description columns; the first non-empty cell wins
    pub description_columns: Vec<String>,

    /// Descriptions matching one of these (case-insensitively) are header
    /// rows echoed into the data and get skipped
    #[serde(default)]
    pub header_labels: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_date_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_date_column: Option<String>,

    /// Planned quantity for the quantity-ratio progress strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_qty_column: Option<String>,

    /// Executed total for the quantity-ratio progress strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_total_column: Option<String>,

    /// Progress family: the mean of positive cells among these columns,
    /// capped at 100. A single-column family reads a percent directly.
    #[serde(default)]
    pub progress_columns: Vec<String>,

    #[serde(default)]
    pub note_columns: Vec<NoteColumn>,
}

/// Nonconformity-sheet columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NocMapping {
    pub sheet: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_column: Option<String>,

    pub description_columns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrective_action_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_date_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closure_date_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_column: Option<String>,
}

/// Fallbacks when the source supplies no identifying cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDefaults {
    pub company: String,
    pub project_code: String,
    pub project_name: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            company: "Generic client".to_string(),
            project_code: "EDP001".to_string(),
            project_name: "Unnamed project".to_string(),
        }
    }
}

/// A complete mapping of one source layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingProfile {
    #[serde(default = "default_profile_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<CoverMapping>,

    pub activities: ActivityMapping,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonconformities: Option<NocMapping>,

    #[serde(default)]
    pub defaults: ProfileDefaults,
}

fn default_profile_name() -> String {
    "custom".to_string()
}

impl MappingProfile {
    /// The multi-sheet layout: a cover sheet, one activity sheet with a
    /// direct percent column, and an optional nonconformity sheet
    pub fn cover() -> Self {
        let header_labels = vec![
            "item".to_string(),
            "descripción".to_string(),
            "actividad".to_string(),
        ];

        Self {
            name: "cover".to_string(),
            cover: Some(CoverMapping {
                sheet: "CARATULA EP".to_string(),
                company_column: Some("Cliente".to_string()),
                project_code_column: None,
                project_name_column: Some("Nombre Proyecto".to_string()),
                supervisor_column: Some("Supervisor".to_string()),
            }),
            activities: ActivityMapping {
                sheet: Some("EDP 001".to_string()),
                item_column: Some("Item".to_string()),
                description_columns: vec!["Descripción".to_string(), "Actividad".to_string()],
                header_labels: header_labels.clone(),
                planned_date_column: Some("Fecha Programada".to_string()),
                actual_date_column: Some("Fecha Real".to_string()),
                planned_qty_column: None,
                executed_total_column: None,
                progress_columns: vec!["% Avance".to_string()],
                note_columns: vec![NoteColumn {
                    column: "Observaciones".to_string(),
                    label: None,
                }],
            },
            nonconformities: Some(NocMapping {
                sheet: "NOC-1".to_string(),
                code_column: Some("Código".to_string()),
                description_columns: vec!["Descripción".to_string()],
                root_cause_column: Some("Causa".to_string()),
                corrective_action_column: Some("Acción Correctiva".to_string()),
                detected_date_column: Some("Fecha Detectada".to_string()),
                closure_date_column: Some("Fecha Cierre".to_string()),
                status_column: Some("Estado".to_string()),
            }),
            defaults: ProfileDefaults::default(),
        }
    }

    /// The single-sheet consolidated layout: everything in the first sheet,
    /// progress derived from quantities and a family of ODS columns
    pub fn consolidated() -> Self {
        Self {
            name: "consolidated".to_string(),
            cover: None,
            activities: ActivityMapping {
                sheet: None,
                item_column: Some("Nº".to_string()),
                description_columns: vec!["ITEM".to_string()],
                header_labels: vec![
                    "item".to_string(),
                    "descripción".to_string(),
                    "actividad".to_string(),
                ],
                planned_date_column: None,
                actual_date_column: None,
                planned_qty_column: Some("Cantidad".to_string()),
                executed_total_column: Some("TOTALES".to_string()),
                progress_columns: ods_candidates(),
                note_columns: vec![
                    NoteColumn {
                        column: "U".to_string(),
                        label: Some("Unit".to_string()),
                    },
                    NoteColumn {
                        column: "Cantidad".to_string(),
                        label: Some("Qty".to_string()),
                    },
                    NoteColumn {
                        column: "PU".to_string(),
                        label: Some("PU".to_string()),
                    },
                    NoteColumn {
                        column: "TOTALES".to_string(),
                        label: Some("Total".to_string()),
                    },
                ],
            },
            nonconformities: None,
            defaults: ProfileDefaults {
                company: "Generic client".to_string(),
                project_code: "EDP-FULL".to_string(),
                project_name: "Consolidated EDP import".to_string(),
            },
        }
    }

    /// Resolve a profile argument: a built-in name or a YAML path
    pub fn resolve(spec: &str) -> Result<Self, ProfileError> {
        match spec {
            "cover" => Ok(Self::cover()),
            "consolidated" => Ok(Self::consolidated()),
            other => {
                let path = Path::new(other);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    Err(ProfileError::Unknown(other.to_string()))
                }
            }
        }
    }

    /// Load a profile from a YAML file
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&contents).map_err(|source| ProfileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render as YAML, the same shape [`from_path`](Self::from_path) reads
    pub fn to_yaml(&self) -> Result<String, serde_yml::Error> {
        serde_yml::to_string(self)
    }
}

/// Candidate names for the ODS progress family. Sources disagree on
/// spacing, so both spellings of each ordinal are listed.
fn ods_candidates() -> Vec<String> {
    (1..=20)
        .flat_map(|i| [format!("ODS {}", i), format!("ODS{}", i)])
        .collect()
}
