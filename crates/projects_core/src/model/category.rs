//! Categories shared between projects through `project_category`.

use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
}

/// Trims a category name; `None` when nothing is left.
pub fn normalize_category_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
