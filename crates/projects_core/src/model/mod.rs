//! Domain model for the project-tracking aggregate.
//!
//! # Responsibility
//! - Define the project aggregate and its child records.
//! - Own field-level validation rules shared by service callers.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never reassigned.
//! - Child collections are only populated by detailed project fetches.

pub mod category;
pub mod material;
pub mod project;
pub mod step;
pub mod validation;
