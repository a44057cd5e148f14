//! ControlSummary entity type - the derived per-project progress rollup

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived progress rollup, one per project.
///
/// Never hand-edited: every field is recomputed from the project's current
/// activity set by [`crate::core::progress::recompute`]. Values may be stale
/// between an activity mutation and the next recompute call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlSummary {
    /// Owning project
    pub project_id: i64,

    /// Count of all activities in the project
    pub total_activities: i64,

    /// Count of activities with completed status
    pub completed_activities: i64,

    /// completed / total * 100, two decimal places; 0 when there are no activities
    pub global_progress: f64,

    /// When the rollup was last recomputed
    pub recomputed_at: DateTime<Utc>,
}
