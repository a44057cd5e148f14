//! SQLite-backed record store
//!
//! This module owns all persistence:
//! - Companies, people, projects, activities, nonconformities
//! - Per-project control summaries (derived rollups)
//! - Import provenance records
//!
//! Unlike a cache, the store is authoritative: a schema version mismatch is
//! an error, never a silent rebuild.

mod queries;
mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Errors from store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Could not create store directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported database schema version {found} (expected {expected}). The database was written by a different obra version")]
    SchemaVersion { found: i32, expected: i32 },
}

/// A status bucket with its record count
#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// One completed import, as recorded for provenance
#[derive(Debug, Clone, Serialize)]
pub struct ImportRecord {
    pub id: i64,
    pub project_id: i64,
    /// Path of the imported source as given on the command line
    pub source: String,
    /// SHA-256 of the source file contents, empty for non-file sources
    pub checksum: String,
    pub profile: String,
    pub activities: i64,
    pub nonconformities: i64,
    pub imported_at: DateTime<Utc>,
}

/// The record store backed by SQLite
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the store at the given path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA foreign_keys=ON;
            "#,
        )?;

        let mut store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open an in-memory store, mainly for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let mut store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Initialize a fresh schema or verify the existing version
    fn ensure_schema(&mut self) -> Result<(), StoreError> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.init_schema()?;
            return Ok(());
        }

        let found: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        if found != SCHEMA_VERSION {
            return Err(StoreError::SchemaVersion {
                found,
                expected: SCHEMA_VERSION,
            });
        }

        Ok(())
    }
}

/// Parse an optional ISO date column, dropping unparseable values
fn parse_date_opt(s: Option<String>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

/// Parse a required ISO date column with a sentinel fallback
fn parse_date(s: String) -> NaiveDate {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
}

/// Parse an RFC 3339 timestamp column with a sentinel fallback
fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
}
