//! Progress aggregation
//!
//! Maintains the derived [`ControlSummary`] of each project. Callers are
//! expected to invoke [`recompute`] after any activity mutation; between
//! mutations the stored summary may be stale.

use chrono::Utc;

use crate::core::store::{Store, StoreError};
use crate::entities::{ControlSummary, Project};

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Recompute and persist the control summary of one project.
///
/// An empty activity set yields zero counts and zero progress rather than a
/// division error. Idempotent: recomputing twice with no intervening
/// mutation produces the same counts and percentage.
pub fn recompute(store: &Store, project_id: i64) -> Result<ControlSummary, StoreError> {
    let (total, completed) = store.activity_counts(project_id)?;

    let global_progress = if total > 0 {
        round2(completed as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    let summary = ControlSummary {
        project_id,
        total_activities: total,
        completed_activities: completed,
        global_progress,
        recomputed_at: Utc::now(),
    };
    store.save_summary(&summary)?;
    Ok(summary)
}

/// Recompute every project's summary, returning them in project-code order
pub fn recompute_all(store: &Store) -> Result<Vec<(Project, ControlSummary)>, StoreError> {
    let mut results = Vec::new();
    for project in store.list_projects()? {
        let summary = recompute(store, project.id)?;
        results.push((project, summary));
    }
    Ok(results)
}
