//! Project aggregate root.
//!
//! # Responsibility
//! - Define the canonical project record and its owned child collections.
//!
//! # Invariants
//! - `project_id` is `None` until the store assigns one on insert.
//! - `materials`, `steps` and `categories` are empty unless the project was
//!   loaded through a detailed fetch.

use super::category::Category;
use super::material::Material;
use super::step::Step;
use super::validation::{
    require_non_negative, require_text, ValidationError, MAX_DIFFICULTY, MIN_DIFFICULTY,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-generated project identifier.
pub type ProjectId = i64;

/// A tracked DIY project together with its materials, steps and categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: Option<ProjectId>,
    pub project_name: String,
    pub estimated_hours: Decimal,
    pub actual_hours: Decimal,
    /// 1 (trivial) to 5 (hard).
    pub difficulty: u8,
    pub notes: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Project {
    /// Creates an unsaved project with no children and zero actual hours.
    pub fn new(project_name: impl Into<String>, estimated_hours: Decimal, difficulty: u8) -> Self {
        Self {
            project_id: None,
            project_name: project_name.into(),
            estimated_hours,
            actual_hours: Decimal::ZERO,
            difficulty,
            notes: None,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Checks scalar fields before they are written.
    ///
    /// Child collections are not inspected; they are persisted separately.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("project_name", &self.project_name)?;
        require_non_negative("estimated_hours", self.estimated_hours)?;
        require_non_negative("actual_hours", self.actual_hours)?;
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ValidationError::DifficultyOutOfRange(self.difficulty));
        }
        Ok(())
    }

    /// Returns whether any child collection is populated.
    pub fn has_children(&self) -> bool {
        !(self.materials.is_empty() && self.steps.is_empty() && self.categories.is_empty())
    }

    /// Copy of this project without child collections, for list views.
    pub fn summary(&self) -> Self {
        Self {
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
            ..self.clone()
        }
    }
}
