//! Ordered instruction rows owned by a project.

use super::project::ProjectId;
use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type StepId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: Option<StepId>,
    pub project_id: ProjectId,
    pub step_text: String,
    /// Position within the project. `None` on insert appends after the last step.
    pub step_order: Option<i32>,
}

impl Step {
    pub fn new(project_id: ProjectId, step_text: impl Into<String>) -> Self {
        Self {
            step_id: None,
            project_id,
            step_text: step_text.into(),
            step_order: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("step_text", &self.step_text)
    }
}
