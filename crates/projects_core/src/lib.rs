//! Transactional data access for the project-tracking aggregate.
//!
//! A project owns materials, steps and categories. The store runs every
//! operation in its own SQLite transaction; the service turns absent rows
//! into `NotFound` failures for callers.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use db::{ConnectionProvider, DbError, SqliteConnectionProvider};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::material::{Material, MaterialId};
pub use model::project::{Project, ProjectId};
pub use model::step::{Step, StepId};
pub use model::validation::ValidationError;
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::{RepoError, RepoResult, StoreFault};
pub use service::project_service::{ProjectService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
