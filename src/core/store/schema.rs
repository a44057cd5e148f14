//! Database schema initialization

use rusqlite::params;

use super::{Store, StoreError, SCHEMA_VERSION};

impl Store {
    /// Initialize the database schema
    pub(super) fn init_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Client companies
            CREATE TABLE IF NOT EXISTS companies (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                tax_id TEXT,
                contact_name TEXT,
                contact_email TEXT
            );

            -- Responsible parties
            CREATE TABLE IF NOT EXISTS people (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                email TEXT,
                is_admin INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1
            );

            -- Projects, keyed by a unique code
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY,
                code TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                company_id INTEGER NOT NULL REFERENCES companies(id),
                responsible_id INTEGER REFERENCES people(id) ON DELETE SET NULL,
                supervisor TEXT,
                start_date TEXT NOT NULL,
                end_date TEXT,
                status TEXT NOT NULL DEFAULT 'planned'
            );
            CREATE INDEX IF NOT EXISTS idx_projects_company ON projects(company_id);
            CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status);

            -- Activity lines
            CREATE TABLE IF NOT EXISTS activities (
                id INTEGER PRIMARY KEY,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                item TEXT,
                description TEXT NOT NULL,
                responsible_id INTEGER REFERENCES people(id) ON DELETE SET NULL,
                planned_date TEXT,
                actual_date TEXT,
                progress REAL NOT NULL DEFAULT 0,
                notes TEXT,
                status TEXT NOT NULL DEFAULT 'pending'
            );
            CREATE INDEX IF NOT EXISTS idx_activities_project ON activities(project_id);
            CREATE INDEX IF NOT EXISTS idx_activities_status ON activities(status);

            -- Nonconformities
            CREATE TABLE IF NOT EXISTS nonconformities (
                id INTEGER PRIMARY KEY,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                code TEXT NOT NULL,
                description TEXT NOT NULL,
                root_cause TEXT,
                corrective_action TEXT,
                responsible_id INTEGER REFERENCES people(id) ON DELETE SET NULL,
                detected_date TEXT NOT NULL,
                closure_date TEXT,
                status TEXT NOT NULL DEFAULT 'open'
            );
            CREATE INDEX IF NOT EXISTS idx_nonconformities_project ON nonconformities(project_id);
            CREATE INDEX IF NOT EXISTS idx_nonconformities_status ON nonconformities(status);

            -- Derived progress rollups, one row per project
            CREATE TABLE IF NOT EXISTS control_summaries (
                project_id INTEGER PRIMARY KEY REFERENCES projects(id) ON DELETE CASCADE,
                total_activities INTEGER NOT NULL DEFAULT 0,
                completed_activities INTEGER NOT NULL DEFAULT 0,
                global_progress REAL NOT NULL DEFAULT 0,
                recomputed_at TEXT NOT NULL
            );

            -- Import provenance
            CREATE TABLE IF NOT EXISTS imports (
                id INTEGER PRIMARY KEY,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                source TEXT NOT NULL,
                checksum TEXT NOT NULL,
                profile TEXT NOT NULL,
                activities INTEGER NOT NULL,
                nonconformities INTEGER NOT NULL,
                imported_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_imports_project ON imports(project_id);
            "#,
        )?;

        // Set schema version
        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }
}
