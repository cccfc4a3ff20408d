//! Transaction-per-operation combinator used by every store operation.
//!
//! # Invariants
//! - The connection is acquired, used and dropped inside one call.
//! - Work that fails is rolled back before the error leaves this module.
//! - A transaction that is neither committed nor rolled back explicitly is
//!   rolled back when dropped.

use super::error::{RepoError, RepoResult, StoreFault};
use crate::db::ConnectionProvider;
use log::{debug, error, warn};
use rusqlite::{Transaction, TransactionBehavior};
use std::time::Instant;

/// Transaction flavor for one store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TxMode {
    /// Deferred: takes the write lock only if a write happens.
    Read,
    /// Immediate: takes the write lock up front.
    Write,
}

impl TxMode {
    fn behavior(self) -> TransactionBehavior {
        match self {
            Self::Read => TransactionBehavior::Deferred,
            Self::Write => TransactionBehavior::Immediate,
        }
    }
}

/// Acquires a unit of work, runs `work` inside one transaction and commits.
///
/// # Errors
/// - `RepoError::Connectivity` when no connection could be acquired.
/// - `RepoError::Operation` when beginning, the work itself, or the commit
///   fails. The transaction is rolled back in every such case.
pub(crate) fn run_in_transaction<P, T, F>(
    provider: &P,
    operation: &'static str,
    mode: TxMode,
    work: F,
) -> RepoResult<T>
where
    P: ConnectionProvider + ?Sized,
    F: FnOnce(&Transaction<'_>) -> Result<T, StoreFault>,
{
    let started_at = Instant::now();
    debug!("event=store_op module=repo status=start op={operation}");

    let mut conn = provider.acquire().map_err(|err| {
        error!(
            "event=store_op module=repo status=error op={} duration_ms={} error_code=connection_unavailable error={}",
            operation,
            started_at.elapsed().as_millis(),
            err
        );
        RepoError::Connectivity(err)
    })?;

    let tx = conn
        .transaction_with_behavior(mode.behavior())
        .map_err(|err| fail(operation, started_at, "tx_begin_failed", err.into()))?;

    match work(&tx) {
        Ok(value) => {
            tx.commit()
                .map_err(|err| fail(operation, started_at, "tx_commit_failed", err.into()))?;
            debug!(
                "event=store_op module=repo status=ok op={} duration_ms={}",
                operation,
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(fault) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=tx_rollback module=repo status=error op={} error={}",
                    operation, rollback_err
                );
            } else {
                warn!("event=tx_rollback module=repo status=ok op={operation}");
            }
            Err(fail(operation, started_at, "store_op_failed", fault))
        }
    }
}

fn fail(
    operation: &'static str,
    started_at: Instant,
    error_code: &str,
    source: StoreFault,
) -> RepoError {
    error!(
        "event=store_op module=repo status=error op={} duration_ms={} error_code={} error={}",
        operation,
        started_at.elapsed().as_millis(),
        error_code,
        source
    );
    RepoError::Operation { operation, source }
}
