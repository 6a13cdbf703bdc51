//! SQLite-backed storage engine for agencies, sub-accounts, team users,
//! permission grants, invitations, the activity log, navigation, pipelines
//! and media.
//!
//! The database lives at `~/.agency-hub/agency-hub.db` unless the config
//! points elsewhere. Child rows reference their owner with
//! `ON DELETE CASCADE`, so deleting an agency or a sub-account removes
//! everything hanging off it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

pub mod types;
pub use types::*;

/// How long a writer waits on another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DashboardDb {
    conn: Connection,
}

impl DashboardDb {
    /// Execute a closure within an immediate SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so reads performed
    /// inside the closure cannot be invalidated by a concurrent writer.
    pub fn with_transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(DbError::from)?;
        match f(self) {
            Ok(val) => {
                self.conn.execute_batch("COMMIT").map_err(DbError::from)?;
                Ok(val)
            }
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("Rollback failed: {rollback}");
                }
                Err(e)
            }
        }
    }

    /// Open (or create) the database at the default path and apply the schema.
    pub fn open() -> Result<Self, DbError> {
        let path = Self::db_path()?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        log::debug!("Opened database at {}", path.display());
        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.agency-hub/agency-hub.db`.
    pub fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".agency-hub").join("agency-hub.db"))
    }

    /// Open the database named by `path`, or the default one when `None`.
    pub fn open_configured(path: Option<&Path>) -> Result<Self, DbError> {
        match path {
            Some(p) => Self::open_at(p.to_path_buf()),
            None => Self::open(),
        }
    }

    /// Generate a fresh row id.
    pub(crate) fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub(crate) fn now() -> String {
        Utc::now().to_rfc3339()
    }

    /// Count rows in `table` whose `column` equals `value`.
    ///
    /// `table` and `column` must be compile-time identifiers, never input.
    #[cfg(test)]
    pub(crate) fn count_where(
        &self,
        table: &'static str,
        column: &'static str,
        value: &str,
    ) -> Result<i64, DbError> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?1");
        Ok(self.conn.query_row(&sql, params![value], |row| row.get(0))?)
    }

    /// True when a row with `id` exists in `table`.
    pub(crate) fn row_exists(&self, table: &'static str, id: &str) -> Result<bool, DbError> {
        let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], |_| Ok(()))
            .optional()?
            .is_some())
    }
}

pub mod agencies;
pub mod invitations;
pub mod media;
pub mod notifications;
pub mod permissions;
pub mod sidebar;
pub mod sub_accounts;
pub mod users;

// =============================================================================
// Shared test utilities
// =============================================================================

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::types::Role;

    /// Create a temporary database for testing.
    ///
    /// We leak the `TempDir` so the directory persists for the duration of the test.
    pub fn test_db() -> DashboardDb {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("test.db");
        std::mem::forget(dir);
        DashboardDb::open_at(path).expect("Failed to open test database")
    }

    pub fn sample_agency(id: &str) -> DbAgency {
        let now = DashboardDb::now();
        DbAgency {
            id: id.to_string(),
            connect_account_id: None,
            customer_id: String::new(),
            name: format!("Agency {id}"),
            agency_logo: "/logos/agency.png".to_string(),
            company_email: "hello@agency.test".to_string(),
            company_phone: "555-0100".to_string(),
            white_label: true,
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            zip_code: "12345".to_string(),
            state: "IL".to_string(),
            country: "US".to_string(),
            goal: 5,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn sample_sub_account(id: &str, agency_id: &str) -> DbSubAccount {
        let now = DashboardDb::now();
        DbSubAccount {
            id: id.to_string(),
            connect_account_id: None,
            name: format!("Client {id}"),
            sub_account_logo: "/logos/client.png".to_string(),
            company_email: "client@example.test".to_string(),
            company_phone: "555-0199".to_string(),
            goal: 5,
            address: "2 Side St".to_string(),
            city: "Shelbyville".to_string(),
            zip_code: "54321".to_string(),
            state: "IL".to_string(),
            country: "US".to_string(),
            agency_id: agency_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn sample_user(id: &str, email: &str, role: Role, agency_id: Option<&str>) -> DbUser {
        let now = DashboardDb::now();
        DbUser {
            id: id.to_string(),
            name: format!("User {id}"),
            avatar_url: "https://img.test/avatar.png".to_string(),
            email: email.to_string(),
            role,
            agency_id: agency_id.map(str::to_string),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Insert an agency with no seeded children.
    pub fn insert_bare_agency(db: &DashboardDb, id: &str) -> DbAgency {
        let agency = sample_agency(id);
        db.insert_agency(&agency).expect("insert agency");
        agency
    }

    /// Drop a table so that every later write to it fails.
    pub fn drop_table(db: &DashboardDb, table: &'static str) {
        db.conn
            .execute_batch(&format!("DROP TABLE {table}"))
            .expect("drop table");
    }

    /// Insert a sub-account with no seeded children.
    pub fn insert_bare_sub_account(db: &DashboardDb, id: &str, agency_id: &str) -> DbSubAccount {
        let sub = sample_sub_account(id, agency_id);
        db.insert_sub_account(&sub).expect("insert sub-account");
        sub
    }
}
