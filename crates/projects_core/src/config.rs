//! Store configuration.
//!
//! # Responsibility
//! - Describe where the project database lives and how connections behave.
//! - Read overrides from process environment for binaries.

use crate::db::DEFAULT_BUSY_TIMEOUT;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the database file.
pub const DB_PATH_ENV: &str = "PROJECTS_DB_PATH";
/// Environment variable holding the busy timeout in milliseconds.
pub const BUSY_TIMEOUT_ENV: &str = "PROJECTS_DB_BUSY_TIMEOUT_MS";

const DEFAULT_DB_FILE_NAME: &str = "projects.sqlite3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable `{name}` has invalid value `{value}`")]
    InvalidValue { name: &'static str, value: String },
}

/// Connection settings for the SQLite-backed project store.
///
/// ```
/// use projects_core::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::new("/tmp/projects.sqlite3")
///     .busy_timeout(Duration::from_millis(250));
/// assert_eq!(config.busy_timeout, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file. Created on first connection.
    pub db_path: PathBuf,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Builds a config from `PROJECTS_DB_PATH` / `PROJECTS_DB_BUSY_TIMEOUT_MS`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(DB_PATH_ENV).filter(|value| !value.trim().is_empty()) {
            config.db_path = PathBuf::from(path.trim());
        }

        if let Some(raw) = lookup(BUSY_TIMEOUT_ENV) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: BUSY_TIMEOUT_ENV,
                    value: raw.clone(),
                })?;
            config.busy_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE_NAME)
    }
}
