//! Store error taxonomy.

use crate::db::DbError;
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// No unit of work could be acquired. Nothing was started, nothing rolled back.
    #[error("could not acquire a database connection: {0}")]
    Connectivity(#[source] DbError),
    /// A statement or row mapping failed; the transaction was rolled back.
    #[error("store operation `{operation}` failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: StoreFault,
    },
    /// Insert was called with a record that already has an identity.
    #[error("{entity} already has id {id}; insert expects an unsaved record")]
    IdAlreadyAssigned { entity: &'static str, id: i64 },
    /// Update was called with a record that was never inserted.
    #[error("{entity} has no id; update expects a saved record")]
    IdUnassigned { entity: &'static str },
}

impl RepoError {
    /// Whether the failure happened while acquiring a connection.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }

    /// Name of the store operation that failed inside its transaction.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Operation { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Failure raised while work runs inside an open transaction.
#[derive(Debug, Error)]
pub enum StoreFault {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    /// A row did not have the shape the target entity expects.
    #[error("cannot map column `{column}` into {entity}: {reason}")]
    Mapping {
        entity: &'static str,
        column: &'static str,
        reason: String,
    },
}
