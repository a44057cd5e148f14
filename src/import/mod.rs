//! Spreadsheet import pipeline
//!
//! Turns a workbook (or CSV directory) into company, project, activity,
//! and nonconformity records, then refreshes the project's control
//! summary. Fatal errors are limited to a missing source, an unusable
//! profile, a missing responsible party, and storage failures; anything
//! row-shaped is absorbed into the [`ImportReport`].

pub mod cell;
pub mod profile;
pub mod report;
pub mod rows;
pub mod source;

pub use cell::CellValue;
pub use profile::{MappingProfile, ProfileError};
pub use report::{ImportReport, NocOutcome, RowError};
pub use source::{CsvDirSource, MemorySource, SheetSource, SourceError, XlsxSource};

use std::path::Path;

use chrono::{Local, NaiveDate};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::progress;
use crate::core::store::{Store, StoreError};
use crate::entities::{NewActivity, NewNonConformity, NewProject, Person, ProjectStatus};

/// Errors that abort an import before or during the run
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No responsible party: give a username with --responsible or add an active admin first")]
    NoResponsibleParty,

    #[error("No person with username '{0}'")]
    UnknownResponsible(String),
}

/// Per-run settings the command line resolves before anything is written
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Person assigned to every imported record
    pub responsible_id: i64,

    /// Overrides the project code from the cover sheet or profile defaults
    pub code: Option<String>,

    /// Overrides the project name
    pub name: Option<String>,

    /// Label recorded as the import's source
    pub source_label: String,

    /// Hex SHA-256 of the source file, when there is one
    pub checksum: Option<String>,

    /// Date stamped on records whose source cell is missing
    pub today: NaiveDate,
}

impl ImportOptions {
    pub fn new(responsible_id: i64) -> Self {
        Self {
            responsible_id,
            code: None,
            name: None,
            source_label: String::new(),
            checksum: None,
            today: Local::now().date_naive(),
        }
    }
}

/// Resolve who imported records belong to.
///
/// An explicit username must exist; without one, the first active admin
/// account stands in. Failing both is fatal and happens before the
/// import writes anything.
pub fn resolve_default_responsible(
    store: &Store,
    username: Option<&str>,
) -> Result<Person, ImportError> {
    if let Some(username) = username {
        return store
            .find_person_by_username(username)?
            .ok_or_else(|| ImportError::UnknownResponsible(username.to_string()));
    }

    store
        .find_privileged_active_user()?
        .ok_or(ImportError::NoResponsibleParty)
}

/// Open a path as a sheet source: directories read as per-sheet CSV
/// files, anything else as an Excel workbook
pub fn open_source(path: &Path) -> Result<Box<dyn SheetSource>, SourceError> {
    if path.is_dir() {
        Ok(Box::new(CsvDirSource::open(path)?))
    } else {
        Ok(Box::new(XlsxSource::open(path)?))
    }
}

/// Hex SHA-256 of a source file; directories carry no checksum
pub fn source_checksum(path: &Path) -> std::io::Result<Option<String>> {
    if path.is_dir() {
        return Ok(None);
    }
    let bytes = std::fs::read(path)?;
    Ok(Some(format!("{:x}", Sha256::digest(&bytes))))
}

/// Run one import against an open store.
///
/// Order of operations: verify the responsible party, read the cover
/// sheet, find or create the company and project, import activity rows,
/// import nonconformity rows, recompute the project summary, record
/// provenance. Existing projects are appended to, never overwritten.
pub fn run(
    store: &Store,
    source: &mut dyn SheetSource,
    profile: &MappingProfile,
    opts: &ImportOptions,
) -> Result<ImportReport, ImportError> {
    // Nothing is written until the responsible party is known to exist
    if store.person(opts.responsible_id)?.is_none() {
        return Err(ImportError::NoResponsibleParty);
    }

    let sheet_names = source.sheet_names();
    let mut warnings = Vec::new();

    // Identity cells, from the cover sheet when the profile maps one
    let mut company_name = profile.defaults.company.clone();
    let mut project_code = profile.defaults.project_code.clone();
    let mut project_name = profile.defaults.project_name.clone();
    let mut supervisor: Option<String> = None;

    if let Some(cover) = &profile.cover {
        match source.read_sheet(&cover.sheet)? {
            Some(sheet) => match sheet.rows.first() {
                Some(row) => {
                    if let Some(value) = cover
                        .company_column
                        .as_deref()
                        .and_then(|col| row.get(col).as_text())
                    {
                        company_name = value;
                    }
                    if let Some(value) = cover
                        .project_code_column
                        .as_deref()
                        .and_then(|col| row.get(col).as_text())
                    {
                        project_code = value;
                    }
                    if let Some(value) = cover
                        .project_name_column
                        .as_deref()
                        .and_then(|col| row.get(col).as_text())
                    {
                        project_name = value;
                    }
                    supervisor = cover
                        .supervisor_column
                        .as_deref()
                        .and_then(|col| row.get(col).as_text());
                }
                None => warnings.push(format!(
                    "Cover sheet '{}' has no data row; using defaults",
                    cover.sheet
                )),
            },
            None => warnings.push(format!(
                "Cover sheet '{}' not found; using defaults",
                cover.sheet
            )),
        }
    }

    if let Some(code) = &opts.code {
        project_code = code.clone();
    }
    if let Some(name) = &opts.name {
        project_name = name.clone();
    }

    let (company, company_created) = match store.find_company_by_name(&company_name)? {
        Some(existing) => (existing, false),
        None => (store.create_company(&company_name, None, None, None)?, true),
    };

    let (project, project_created) = match store.find_project_by_code(&project_code)? {
        Some(existing) => (existing, false),
        None => {
            let project = store.create_project(&NewProject {
                code: project_code.clone(),
                name: project_name.clone(),
                company_id: company.id,
                responsible_id: Some(opts.responsible_id),
                supervisor: supervisor.clone(),
                start_date: opts.today,
                end_date: None,
                status: ProjectStatus::InProgress,
            })?;
            (project, true)
        }
    };

    // Activity rows
    let mut imported = 0usize;
    let mut skipped = 0usize;
    let mut row_errors = Vec::new();

    let activity_sheet = profile
        .activities
        .sheet
        .clone()
        .or_else(|| sheet_names.first().cloned());

    match activity_sheet {
        None => warnings.push("Source has no sheets; no activities imported".to_string()),
        Some(name) => match source.read_sheet(&name)? {
            None => warnings.push(format!(
                "Activity sheet '{}' not found; no activities imported",
                name
            )),
            Some(sheet) => {
                for (idx, row) in sheet.rows.iter().enumerate() {
                    let extracted = match rows::extract_activity(row, &profile.activities) {
                        Ok(extracted) => extracted,
                        Err(_) => {
                            skipped += 1;
                            continue;
                        }
                    };

                    let new_activity = NewActivity {
                        project_id: project.id,
                        item: extracted.item,
                        description: extracted.description,
                        responsible_id: Some(opts.responsible_id),
                        planned_date: extracted.planned_date,
                        actual_date: extracted.actual_date,
                        progress: extracted.progress,
                        notes: extracted.notes,
                        status: extracted.status,
                    };
                    match store.create_activity(&new_activity) {
                        Ok(_) => imported += 1,
                        Err(e) => row_errors.push(RowError {
                            sheet: sheet.name.clone(),
                            row: idx + 2,
                            message: e.to_string(),
                        }),
                    }
                }
            }
        },
    }

    // Nonconformity rows; the sheet is optional
    let nonconformities = match &profile.nonconformities {
        None => NocOutcome::NotConfigured,
        Some(mapping) => match source.read_sheet(&mapping.sheet)? {
            None => NocOutcome::SheetAbsent,
            Some(sheet) => {
                let mut count = 0usize;
                // Generated fallback codes number non-blank rows only
                let mut processed = 0usize;
                for (idx, row) in sheet.rows.iter().enumerate() {
                    let extracted = match rows::extract_noc(row, mapping, processed, opts.today) {
                        Some(extracted) => extracted,
                        None => continue,
                    };
                    processed += 1;

                    let new_noc = NewNonConformity {
                        project_id: project.id,
                        code: extracted.code,
                        description: extracted.description,
                        root_cause: extracted.root_cause,
                        corrective_action: extracted.corrective_action,
                        responsible_id: Some(opts.responsible_id),
                        detected_date: extracted.detected_date,
                        closure_date: extracted.closure_date,
                        status: extracted.status,
                    };
                    match store.create_nonconformity(&new_noc) {
                        Ok(_) => count += 1,
                        Err(e) => row_errors.push(RowError {
                            sheet: sheet.name.clone(),
                            row: idx + 2,
                            message: e.to_string(),
                        }),
                    }
                }
                NocOutcome::Imported(count)
            }
        },
    };

    let summary = progress::recompute(store, project.id)?;

    let noc_count = match nonconformities {
        NocOutcome::Imported(count) => count as i64,
        _ => 0,
    };
    store.record_import(
        project.id,
        &opts.source_label,
        opts.checksum.as_deref().unwrap_or(""),
        &profile.name,
        imported as i64,
        noc_count,
    )?;

    Ok(ImportReport {
        source: opts.source_label.clone(),
        profile: profile.name.clone(),
        company: company.name,
        company_created,
        project_code: project.code,
        project_name: project.name,
        project_created,
        activities_imported: imported,
        rows_skipped: skipped,
        row_errors,
        nonconformities,
        warnings,
        total_activities: summary.total_activities,
        completed_activities: summary.completed_activities,
        global_progress: summary.global_progress,
    })
}
