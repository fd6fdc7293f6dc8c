pub mod project;
pub mod seed;
pub mod stats;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use thiserror::Error;

use crate::models::ValidationError;
use crate::settings::Settings;

const MIGRATION: &str = include_str!("../../migrations/001_init.sql");

/// Failures of write operations, split so callers can tell bad input from a
/// broken store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("projectId already exists: {0}")]
    Duplicate(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating parent directories as needed.
    /// Enables WAL mode.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;

        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        if mode != "wal" {
            anyhow::bail!("failed to enable WAL mode, got: {mode}");
        }

        Ok(Self { conn })
    }

    /// Open and migrate the database named by `settings`.
    pub fn open_default(settings: &Settings) -> Result<Self> {
        let path = settings.database_path()?;
        tracing::debug!(path = %path.display(), "opening database");
        let db = Self::open(&path)?;
        db.migrate()?;
        Ok(db)
    }

    /// Run all migrations. Idempotent thanks to `IF NOT EXISTS` clauses.
    pub fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(MIGRATION)
            .context("failed to run database migration")?;
        Ok(())
    }

    /// Access the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) fn open_temp_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        (db, dir)
    }

    #[test]
    fn test_open_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("test.db");
        let _db = Database::open(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_default_uses_configured_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("configured.db");
        let settings = Settings {
            database: Some(path.clone()),
            ..Default::default()
        };
        let db = Database::open_default(&settings).unwrap();
        assert!(path.exists());
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_migrate_creates_tables_and_indexes() {
        let (db, _dir) = open_temp_db();
        let names: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type IN ('table', 'index') AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(names, ["idx_projects_stage", "projects"]);
    }

    #[test]
    fn test_migrate_idempotent() {
        let (db, _dir) = open_temp_db();
        db.migrate().unwrap(); // second run should succeed
    }

    #[test]
    fn test_stage_check_constraint() {
        let (db, _dir) = open_temp_db();
        let result = db.conn().execute(
            "INSERT INTO projects (id, project_id, name, start_date, end_date, stage, \
             resource_allocated, ppa_performance, ppa_power, ppa_area, eligible_rd, \
             actual_spend, forecast_spend, tax_credit_eligible) \
             VALUES ('x', 'X-1', 'X', '2025-01-01', '2025-02-01', 'Planning', 1, 'a', 'b', 'c', 0, 0, 0, 0)",
            [],
        );
        assert!(result.is_err(), "should reject unknown stage");
    }

    #[test]
    fn test_wal_mode_enabled() {
        let (db, _dir) = open_temp_db();
        let mode: String = db
            .conn()
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }
}
