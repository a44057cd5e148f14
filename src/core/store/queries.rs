//! Typed query methods for every record kind

use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, parse_date_opt, parse_datetime, ImportRecord, StatusCount, Store, StoreError};
use crate::entities::{
    Activity, Company, ControlSummary, NewActivity, NewNonConformity, NewProject, NonConformity,
    Person, Project,
};

fn row_to_company(row: &Row) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        tax_id: row.get(2)?,
        contact_name: row.get(3)?,
        contact_email: row.get(4)?,
    })
}

fn row_to_person(row: &Row) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        username: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        is_admin: row.get(4)?,
        is_active: row.get(5)?,
    })
}

fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        company_id: row.get(3)?,
        responsible_id: row.get(4)?,
        supervisor: row.get(5)?,
        start_date: parse_date(row.get::<_, String>(6)?),
        end_date: parse_date_opt(row.get(7)?),
        status: row.get::<_, String>(8)?.parse().unwrap_or_default(),
    })
}

fn row_to_activity(row: &Row) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        project_id: row.get(1)?,
        item: row.get(2)?,
        description: row.get(3)?,
        responsible_id: row.get(4)?,
        planned_date: parse_date_opt(row.get(5)?),
        actual_date: parse_date_opt(row.get(6)?),
        progress: row.get(7)?,
        notes: row.get(8)?,
        status: row.get::<_, String>(9)?.parse().unwrap_or_default(),
    })
}

fn row_to_noc(row: &Row) -> rusqlite::Result<NonConformity> {
    Ok(NonConformity {
        id: row.get(0)?,
        project_id: row.get(1)?,
        code: row.get(2)?,
        description: row.get(3)?,
        root_cause: row.get(4)?,
        corrective_action: row.get(5)?,
        responsible_id: row.get(6)?,
        detected_date: parse_date(row.get::<_, String>(7)?),
        closure_date: parse_date_opt(row.get(8)?),
        status: row.get::<_, String>(9)?.parse().unwrap_or_default(),
    })
}

fn row_to_summary(row: &Row) -> rusqlite::Result<ControlSummary> {
    Ok(ControlSummary {
        project_id: row.get(0)?,
        total_activities: row.get(1)?,
        completed_activities: row.get(2)?,
        global_progress: row.get(3)?,
        recomputed_at: parse_datetime(row.get::<_, String>(4)?),
    })
}

fn row_to_import(row: &Row) -> rusqlite::Result<ImportRecord> {
    Ok(ImportRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        source: row.get(2)?,
        checksum: row.get(3)?,
        profile: row.get(4)?,
        activities: row.get(5)?,
        nonconformities: row.get(6)?,
        imported_at: parse_datetime(row.get::<_, String>(7)?),
    })
}

const COMPANY_COLS: &str = "id, name, tax_id, contact_name, contact_email";
const PERSON_COLS: &str = "id, username, full_name, email, is_admin, is_active";
const PROJECT_COLS: &str =
    "id, code, name, company_id, responsible_id, supervisor, start_date, end_date, status";
const ACTIVITY_COLS: &str = "id, project_id, item, description, responsible_id, planned_date, actual_date, progress, notes, status";
const NOC_COLS: &str = "id, project_id, code, description, root_cause, corrective_action, responsible_id, detected_date, closure_date, status";

impl Store {
    // =========================================================================
    // Companies
    // =========================================================================

    pub fn create_company(
        &self,
        name: &str,
        tax_id: Option<&str>,
        contact_name: Option<&str>,
        contact_email: Option<&str>,
    ) -> Result<Company, StoreError> {
        self.conn.execute(
            "INSERT INTO companies (name, tax_id, contact_name, contact_email) VALUES (?1, ?2, ?3, ?4)",
            params![name, tax_id, contact_name, contact_email],
        )?;

        Ok(Company {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            tax_id: tax_id.map(String::from),
            contact_name: contact_name.map(String::from),
            contact_email: contact_email.map(String::from),
        })
    }

    /// Exact, case-sensitive name lookup
    pub fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM companies WHERE name = ?1", COMPANY_COLS),
                params![name],
                row_to_company,
            )
            .optional()?)
    }

    pub fn company(&self, id: i64) -> Result<Option<Company>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM companies WHERE id = ?1", COMPANY_COLS),
                params![id],
                row_to_company,
            )
            .optional()?)
    }

    pub fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM companies ORDER BY name", COMPANY_COLS))?;
        let rows = stmt.query_map([], row_to_company)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // =========================================================================
    // People
    // =========================================================================

    pub fn create_person(
        &self,
        username: &str,
        full_name: &str,
        email: Option<&str>,
        is_admin: bool,
        is_active: bool,
    ) -> Result<Person, StoreError> {
        self.conn.execute(
            "INSERT INTO people (username, full_name, email, is_admin, is_active) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![username, full_name, email, is_admin, is_active],
        )?;

        Ok(Person {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            email: email.map(String::from),
            is_admin,
            is_active,
        })
    }

    pub fn find_person_by_username(&self, username: &str) -> Result<Option<Person>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM people WHERE username = ?1", PERSON_COLS),
                params![username],
                row_to_person,
            )
            .optional()?)
    }

    pub fn person(&self, id: i64) -> Result<Option<Person>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM people WHERE id = ?1", PERSON_COLS),
                params![id],
                row_to_person,
            )
            .optional()?)
    }

    pub fn list_people(&self) -> Result<Vec<Person>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM people ORDER BY username", PERSON_COLS))?;
        let rows = stmt.query_map([], row_to_person)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// First active admin account, by insertion order
    pub fn find_privileged_active_user(&self) -> Result<Option<Person>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM people WHERE is_admin AND is_active ORDER BY id LIMIT 1",
                    PERSON_COLS
                ),
                [],
                row_to_person,
            )
            .optional()?)
    }

    // =========================================================================
    // Projects
    // =========================================================================

    pub fn create_project(&self, new: &NewProject) -> Result<Project, StoreError> {
        self.conn.execute(
            r#"INSERT INTO projects (code, name, company_id, responsible_id, supervisor, start_date, end_date, status)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                new.code,
                new.name,
                new.company_id,
                new.responsible_id,
                new.supervisor,
                new.start_date.to_string(),
                new.end_date.map(|d| d.to_string()),
                new.status.to_string(),
            ],
        )?;

        Ok(Project {
            id: self.conn.last_insert_rowid(),
            code: new.code.clone(),
            name: new.name.clone(),
            company_id: new.company_id,
            responsible_id: new.responsible_id,
            supervisor: new.supervisor.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            status: new.status,
        })
    }

    pub fn find_project_by_code(&self, code: &str) -> Result<Option<Project>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM projects WHERE code = ?1", PROJECT_COLS),
                params![code],
                row_to_project,
            )
            .optional()?)
    }

    pub fn project(&self, id: i64) -> Result<Option<Project>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLS),
                params![id],
                row_to_project,
            )
            .optional()?)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM projects ORDER BY code", PROJECT_COLS))?;
        let rows = stmt.query_map([], row_to_project)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Deletes a project and, through cascades, its activities,
    /// nonconformities, summary, and import records
    pub fn delete_project(&self, id: i64) -> Result<bool, StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Count projects grouped by lifecycle status
    pub fn project_status_counts(&self) -> Vec<StatusCount> {
        self.status_counts("SELECT status, COUNT(*) FROM projects GROUP BY status ORDER BY COUNT(*) DESC")
    }

    // =========================================================================
    // Activities
    // =========================================================================

    pub fn create_activity(&self, new: &NewActivity) -> Result<Activity, StoreError> {
        self.conn.execute(
            r#"INSERT INTO activities (project_id, item, description, responsible_id, planned_date, actual_date, progress, notes, status)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                new.project_id,
                new.item,
                new.description,
                new.responsible_id,
                new.planned_date.map(|d| d.to_string()),
                new.actual_date.map(|d| d.to_string()),
                new.progress,
                new.notes,
                new.status.to_string(),
            ],
        )?;

        Ok(Activity {
            id: self.conn.last_insert_rowid(),
            project_id: new.project_id,
            item: new.item.clone(),
            description: new.description.clone(),
            responsible_id: new.responsible_id,
            planned_date: new.planned_date,
            actual_date: new.actual_date,
            progress: new.progress,
            notes: new.notes.clone(),
            status: new.status,
        })
    }

    pub fn activity(&self, id: i64) -> Result<Option<Activity>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM activities WHERE id = ?1", ACTIVITY_COLS),
                params![id],
                row_to_activity,
            )
            .optional()?)
    }

    pub fn list_activities(&self, project_id: i64) -> Result<Vec<Activity>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM activities WHERE project_id = ?1 ORDER BY id",
            ACTIVITY_COLS
        ))?;
        let rows = stmt.query_map(params![project_id], row_to_activity)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn update_activity(&self, activity: &Activity) -> Result<(), StoreError> {
        self.conn.execute(
            r#"UPDATE activities
               SET item = ?2, description = ?3, responsible_id = ?4, planned_date = ?5,
                   actual_date = ?6, progress = ?7, notes = ?8, status = ?9
               WHERE id = ?1"#,
            params![
                activity.id,
                activity.item,
                activity.description,
                activity.responsible_id,
                activity.planned_date.map(|d| d.to_string()),
                activity.actual_date.map(|d| d.to_string()),
                activity.progress,
                activity.notes,
                activity.status.to_string(),
            ],
        )?;
        Ok(())
    }

    pub fn delete_activity(&self, id: i64) -> Result<bool, StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM activities WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// (total, completed) activity counts for one project
    pub fn activity_counts(&self, project_id: i64) -> Result<(i64, i64), StoreError> {
        Ok(self.conn.query_row(
            r#"SELECT COUNT(*),
                      COUNT(*) FILTER (WHERE status = 'completed')
               FROM activities WHERE project_id = ?1"#,
            params![project_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
    }

    /// Count activities grouped by workflow status, across all projects
    pub fn activity_status_counts(&self) -> Vec<StatusCount> {
        self.status_counts(
            "SELECT status, COUNT(*) FROM activities GROUP BY status ORDER BY COUNT(*) DESC",
        )
    }

    /// Mean completion percentage across all activities
    pub fn average_progress(&self) -> Option<f64> {
        self.conn
            .query_row("SELECT AVG(progress) FROM activities", [], |row| row.get(0))
            .unwrap_or(None)
    }

    // =========================================================================
    // Nonconformities
    // =========================================================================

    pub fn create_nonconformity(
        &self,
        new: &NewNonConformity,
    ) -> Result<NonConformity, StoreError> {
        self.conn.execute(
            r#"INSERT INTO nonconformities (project_id, code, description, root_cause, corrective_action, responsible_id, detected_date, closure_date, status)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                new.project_id,
                new.code,
                new.description,
                new.root_cause,
                new.corrective_action,
                new.responsible_id,
                new.detected_date.to_string(),
                new.closure_date.map(|d| d.to_string()),
                new.status.to_string(),
            ],
        )?;

        Ok(NonConformity {
            id: self.conn.last_insert_rowid(),
            project_id: new.project_id,
            code: new.code.clone(),
            description: new.description.clone(),
            root_cause: new.root_cause.clone(),
            corrective_action: new.corrective_action.clone(),
            responsible_id: new.responsible_id,
            detected_date: new.detected_date,
            closure_date: new.closure_date,
            status: new.status,
        })
    }

    pub fn noc(&self, id: i64) -> Result<Option<NonConformity>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM nonconformities WHERE id = ?1", NOC_COLS),
                params![id],
                row_to_noc,
            )
            .optional()?)
    }

    pub fn list_nonconformities(&self, project_id: i64) -> Result<Vec<NonConformity>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM nonconformities WHERE project_id = ?1 ORDER BY id",
            NOC_COLS
        ))?;
        let rows = stmt.query_map(params![project_id], row_to_noc)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Set the closure date and mark closed
    pub fn close_nonconformity(
        &self,
        id: i64,
        closure_date: NaiveDate,
    ) -> Result<bool, StoreError> {
        let affected = self.conn.execute(
            "UPDATE nonconformities SET closure_date = ?2, status = 'closed' WHERE id = ?1",
            params![id, closure_date.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// All unclosed nonconformities, joined with their project code
    pub fn open_nonconformities(&self) -> Result<Vec<(String, NonConformity)>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"SELECT p.code, n.id, n.project_id, n.code, n.description, n.root_cause,
                      n.corrective_action, n.responsible_id, n.detected_date, n.closure_date, n.status
               FROM nonconformities n
               JOIN projects p ON n.project_id = p.id
               WHERE n.status != 'closed'
               ORDER BY n.detected_date, n.id"#,
        )?;
        let rows = stmt.query_map([], |row| {
            let project_code: String = row.get(0)?;
            let noc = NonConformity {
                id: row.get(1)?,
                project_id: row.get(2)?,
                code: row.get(3)?,
                description: row.get(4)?,
                root_cause: row.get(5)?,
                corrective_action: row.get(6)?,
                responsible_id: row.get(7)?,
                detected_date: parse_date(row.get::<_, String>(8)?),
                closure_date: parse_date_opt(row.get(9)?),
                status: row.get::<_, String>(10)?.parse().unwrap_or_default(),
            };
            Ok((project_code, noc))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Count nonconformities grouped by workflow status, across all projects
    pub fn noc_status_counts(&self) -> Vec<StatusCount> {
        self.status_counts(
            "SELECT status, COUNT(*) FROM nonconformities GROUP BY status ORDER BY COUNT(*) DESC",
        )
    }

    // =========================================================================
    // Control summaries
    // =========================================================================

    pub fn summary(&self, project_id: i64) -> Result<Option<ControlSummary>, StoreError> {
        Ok(self
            .conn
            .query_row(
                r#"SELECT project_id, total_activities, completed_activities, global_progress, recomputed_at
                   FROM control_summaries WHERE project_id = ?1"#,
                params![project_id],
                row_to_summary,
            )
            .optional()?)
    }

    /// Fetch the summary, creating a zeroed one on first access
    pub fn get_or_create_summary(&self, project_id: i64) -> Result<ControlSummary, StoreError> {
        if let Some(summary) = self.summary(project_id)? {
            return Ok(summary);
        }

        let summary = ControlSummary {
            project_id,
            total_activities: 0,
            completed_activities: 0,
            global_progress: 0.0,
            recomputed_at: Utc::now(),
        };
        self.save_summary(&summary)?;
        Ok(summary)
    }

    pub fn save_summary(&self, summary: &ControlSummary) -> Result<(), StoreError> {
        self.conn.execute(
            r#"INSERT OR REPLACE INTO control_summaries
               (project_id, total_activities, completed_activities, global_progress, recomputed_at)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                summary.project_id,
                summary.total_activities,
                summary.completed_activities,
                summary.global_progress,
                summary.recomputed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // =========================================================================
    // Import provenance
    // =========================================================================

    pub fn record_import(
        &self,
        project_id: i64,
        source: &str,
        checksum: &str,
        profile: &str,
        activities: i64,
        nonconformities: i64,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            r#"INSERT INTO imports (project_id, source, checksum, profile, activities, nonconformities, imported_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            params![
                project_id,
                source,
                checksum,
                profile,
                activities,
                nonconformities,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn imports_for_project(&self, project_id: i64) -> Result<Vec<ImportRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, project_id, source, checksum, profile, activities, nonconformities, imported_at
               FROM imports WHERE project_id = ?1 ORDER BY id"#,
        )?;
        let rows = stmt.query_map(params![project_id], row_to_import)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    fn status_counts(&self, sql: &str) -> Vec<StatusCount> {
        let mut stmt = match self.conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let rows = match stmt.query_map([], |row| {
            Ok(StatusCount {
                status: row.get(0)?,
                count: row.get::<_, i64>(1)? as usize,
            })
        }) {
            Ok(r) => r,
            Err(_) => return vec![],
        };

        rows.filter_map(|r| r.ok()).collect()
    }
}
