//! Database layer for the clinic core.

mod schema;
mod users;
mod pets;
mod appointments;
mod medical_records;
mod events;

pub use schema::*;
#[allow(unused_imports)]
pub use users::*;
#[allow(unused_imports)]
pub use pets::*;
pub use appointments::*;
#[allow(unused_imports)]
pub use medical_records::*;
#[allow(unused_imports)]
pub use events::*;

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Scheduling conflict: {0}")]
    Conflict(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
///
/// Each request handler opens its own `Database` on the shared file; there is
/// no in-process lock. Write serialization comes from SQLite itself (see
/// [`Database::immediate_transaction`]).
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    ///
    /// Enables WAL so readers never block behind writers, and sets a busy
    /// timeout so concurrent writers queue instead of failing immediately.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a write transaction that takes the database lock up front.
    ///
    /// A second handle entering here blocks until the first commits, then
    /// observes its rows; this is the serialization point for check-then-write
    /// booking.
    pub fn immediate_transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?)
    }
}
