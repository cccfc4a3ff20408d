//! SQLite storage bootstrap, schema migrations and unit-of-work acquisition.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the project store.
//! - Apply schema migrations in deterministic order.
//! - Hand out one owned connection per store operation.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.
//! - A connection returned by a provider is used by exactly one operation.

use thiserror::Error;

pub mod migrations;
mod open;
mod provider;

pub use open::{open_db, open_db_in_memory, DEFAULT_BUSY_TIMEOUT};
pub use provider::{ConnectionProvider, SqliteConnectionProvider};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(
        "database schema version {db_version} is newer than supported {latest_supported}"
    )]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}
