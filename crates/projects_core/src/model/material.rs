//! Material rows owned by a project.

use super::project::ProjectId;
use super::validation::{require_non_negative, require_text, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type MaterialId = i64;

/// Something that has to be bought or gathered for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: Option<MaterialId>,
    pub project_id: ProjectId,
    pub material_name: String,
    pub num_required: Option<i32>,
    pub cost: Option<Decimal>,
}

impl Material {
    pub fn new(project_id: ProjectId, material_name: impl Into<String>) -> Self {
        Self {
            material_id: None,
            project_id,
            material_name: material_name.into(),
            num_required: None,
            cost: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("material_name", &self.material_name)?;
        if let Some(count) = self.num_required {
            if count < 0 {
                return Err(ValidationError::NegativeQuantity(count));
            }
        }
        if let Some(cost) = self.cost {
            require_non_negative("cost", cost)?;
        }
        Ok(())
    }
}
