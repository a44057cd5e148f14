//! Row extraction rules
//!
//! Pure functions turning raw sheet rows into activity and nonconformity
//! field sets. Everything here is total: malformed cells default or skip,
//! they never abort an import.

use chrono::NaiveDate;

use super::profile::{ActivityMapping, NocMapping};
use super::source::SheetRow;
use crate::core::progress::round2;
use crate::entities::{ActivityStatus, NocStatus};

/// Maximum stored length of an item code, in characters
const ITEM_CODE_MAX: usize = 20;

/// Fields extracted from one activity row
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    pub item: Option<String>,
    pub description: String,
    pub planned_date: Option<NaiveDate>,
    pub actual_date: Option<NaiveDate>,
    pub progress: f64,
    pub status: ActivityStatus,
    pub notes: Option<String>,
}

/// Fields extracted from one nonconformity row
#[derive(Debug, Clone, PartialEq)]
pub struct NocRow {
    pub code: String,
    pub description: String,
    pub root_cause: Option<String>,
    pub corrective_action: Option<String>,
    pub detected_date: NaiveDate,
    pub closure_date: Option<NaiveDate>,
    pub status: NocStatus,
}

/// Why an activity row was not imported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No description cell carried text
    EmptyDescription,
    /// The description repeats a column header
    HeaderEcho,
}

/// Extract an activity from a row; `Err` means the row is skipped
pub fn extract_activity(
    row: &SheetRow,
    mapping: &ActivityMapping,
) -> Result<ActivityRow, SkipReason> {
    let description = mapping
        .description_columns
        .iter()
        .find_map(|col| row.get(col).as_text())
        .ok_or(SkipReason::EmptyDescription)?;

    let lowered = description.to_lowercase();
    if mapping
        .header_labels
        .iter()
        .any(|label| label.to_lowercase() == lowered)
    {
        return Err(SkipReason::HeaderEcho);
    }

    let item = mapping
        .item_column
        .as_deref()
        .and_then(|col| row.get(col).as_text())
        .map(|code| code.chars().take(ITEM_CODE_MAX).collect());

    let planned_date = mapping
        .planned_date_column
        .as_deref()
        .and_then(|col| row.get(col).as_date());
    let actual_date = mapping
        .actual_date_column
        .as_deref()
        .and_then(|col| row.get(col).as_date());

    let progress = compute_progress(row, mapping);

    Ok(ActivityRow {
        item,
        description,
        planned_date,
        actual_date,
        progress,
        status: ActivityStatus::from_progress(progress),
        notes: build_notes(row, mapping),
    })
}

/// Completion percentage for one row, rounded to two places.
///
/// Strategies, in priority order:
/// 1. Quantity ratio: both quantity cells numeric and positive gives
///    `min(executed / planned * 100, 100)`. Zero or negative executed
///    totals (deduction line items) fall through instead of reading as
///    zero progress.
/// 2. Progress family: positive cells among the configured columns give
///    `min(mean(positive cells), 100)`.
/// 3. Zero.
pub fn compute_progress(row: &SheetRow, mapping: &ActivityMapping) -> f64 {
    if let (Some(qty_col), Some(total_col)) = (
        mapping.planned_qty_column.as_deref(),
        mapping.executed_total_column.as_deref(),
    ) {
        if let (Some(planned), Some(executed)) =
            (row.get(qty_col).as_number(), row.get(total_col).as_number())
        {
            if planned > 0.0 && executed > 0.0 {
                return round2((executed / planned * 100.0).min(100.0));
            }
        }
    }

    let positives: Vec<f64> = mapping
        .progress_columns
        .iter()
        .filter_map(|col| row.get(col).as_number())
        .filter(|value| *value > 0.0)
        .collect();

    if !positives.is_empty() {
        let mean = positives.iter().sum::<f64>() / positives.len() as f64;
        return round2(mean.min(100.0));
    }

    0.0
}

/// Assemble notes from the configured extra columns.
///
/// Empty cells and zero-valued numeric cells contribute nothing; the rest
/// join with " | ", labeled where the profile labels them.
fn build_notes(row: &SheetRow, mapping: &ActivityMapping) -> Option<String> {
    let parts: Vec<String> = mapping
        .note_columns
        .iter()
        .filter_map(|note| {
            let cell = row.get(&note.column);
            let value = cell.as_text()?;
            if cell.as_number() == Some(0.0) {
                return None;
            }
            Some(match &note.label {
                Some(label) => format!("{}: {}", label, value),
                None => value,
            })
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

/// Extract a nonconformity from a row.
///
/// `index` is the 0-based ordinal among processed nonconformity rows and
/// feeds the generated fallback code; `today` fills a missing detected
/// date. `None` means every mapped cell was blank (spreadsheet tail).
pub fn extract_noc(
    row: &SheetRow,
    mapping: &NocMapping,
    index: usize,
    today: NaiveDate,
) -> Option<NocRow> {
    let mapped_columns = mapping
        .code_column
        .iter()
        .chain(mapping.description_columns.iter())
        .chain(mapping.root_cause_column.iter())
        .chain(mapping.corrective_action_column.iter())
        .chain(mapping.detected_date_column.iter())
        .chain(mapping.closure_date_column.iter())
        .chain(mapping.status_column.iter());
    if mapped_columns
        .map(|col| row.get(col))
        .all(|cell| cell.is_empty())
    {
        return None;
    }

    let description = mapping
        .description_columns
        .iter()
        .find_map(|col| row.get(col).as_text())
        .unwrap_or_default();

    let detected_date = mapping
        .detected_date_column
        .as_deref()
        .and_then(|col| row.get(col).as_date())
        .unwrap_or(today);

    let closure_date = mapping
        .closure_date_column
        .as_deref()
        .and_then(|col| row.get(col).as_date());

    let raw_status = mapping
        .status_column
        .as_deref()
        .and_then(|col| row.get(col).as_text());

    let code = mapping
        .code_column
        .as_deref()
        .and_then(|col| row.get(col).as_text())
        .unwrap_or_else(|| format!("NOC-{}", index + 1));

    Some(NocRow {
        code,
        description,
        root_cause: mapping
            .root_cause_column
            .as_deref()
            .and_then(|col| row.get(col).as_text()),
        corrective_action: mapping
            .corrective_action_column
            .as_deref()
            .and_then(|col| row.get(col).as_text()),
        detected_date,
        closure_date,
        status: NocStatus::derive(closure_date, raw_status.as_deref()),
    })
}
