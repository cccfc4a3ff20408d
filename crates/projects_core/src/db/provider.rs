//! Unit-of-work acquisition.
//!
//! # Invariants
//! - Every `acquire` call returns a fresh, fully bootstrapped connection.
//! - The caller owns the connection; dropping it releases the handle.

use super::{open_db, DbResult};
use crate::config::StoreConfig;
use rusqlite::Connection;

/// Source of per-operation database connections.
pub trait ConnectionProvider {
    /// Opens one unit of work. Fails when no connection can be established.
    fn acquire(&self) -> DbResult<Connection>;
}

/// File-backed provider opening a new connection per unit of work.
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    config: StoreConfig,
}

impl SqliteConnectionProvider {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }
}

impl ConnectionProvider for SqliteConnectionProvider {
    fn acquire(&self) -> DbResult<Connection> {
        open_db(&self.config.db_path, self.config.busy_timeout)
    }
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    fn acquire(&self) -> DbResult<Connection> {
        (**self).acquire()
    }
}
