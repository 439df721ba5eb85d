//! Database connection management

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database not found at {0}")]
    NotFound(PathBuf),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database has no cdr table")]
    NotInitialized,
}

/// Default database path (~/.cdr/cdr.db)
pub fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
    PathBuf::from(home).join(".cdr").join("cdr.db")
}

/// Read-only connection to the CDR store
pub struct CdrDb {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl CdrDb {
    /// Open the database at a specific path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(DbError::NotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let db = Self { conn, path };
        db.check_initialized()?;

        Ok(db)
    }

    /// Wrap an existing connection (in-memory stores, fixtures)
    pub fn from_connection(conn: Connection) -> Result<Self, DbError> {
        let path = conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(":memory:"));

        let db = Self { conn, path };
        db.check_initialized()?;

        Ok(db)
    }

    fn check_initialized(&self) -> Result<(), DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'cdr')",
            [],
            |row| row.get(0),
        )?;

        if exists {
            Ok(())
        } else {
            Err(DbError::NotInitialized)
        }
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the underlying connection (for custom queries)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats, DbError> {
        let (record_count, earliest, latest): (i64, Option<String>, Option<String>) =
            self.conn.query_row(
                "SELECT COUNT(*), MIN(start_stamp), MAX(start_stamp) FROM cdr",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

        let db_size = std::fs::metadata(&self.path)
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(DbStats {
            record_count,
            earliest,
            latest,
            db_path: self.path.clone(),
            db_size_bytes: db_size,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub record_count: i64,
    pub earliest: Option<String>,
    pub latest: Option<String>,
    pub db_path: PathBuf,
    pub db_size_bytes: u64,
}
