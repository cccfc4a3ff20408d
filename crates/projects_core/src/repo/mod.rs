//! Repository layer: SQL, transactions and aggregate assembly.
//!
//! # Responsibility
//! - Define the project store contract and its SQLite implementation.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Every public store operation runs in exactly one transaction.
//! - "Not found" is reported as `Option::None` / `false`, never as an error.
//! - Failures inside a transaction are rolled back before they are returned.

pub mod error;
pub mod project_repo;
pub mod row;
mod unit_of_work;

pub use error::{RepoError, RepoResult, StoreFault};
