//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Turn absent rows into domain `NotFound` failures.

pub mod project_service;
