//! Field validation failures for aggregate records.

use rust_decimal::Decimal;
use thiserror::Error;

/// Lowest accepted project difficulty.
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest accepted project difficulty.
pub const MAX_DIFFICULTY: u8 = 5;

/// Rejected field values on projects, materials and steps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`{field}` must not be blank")]
    Blank { field: &'static str },
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },
    #[error("difficulty must be between 1 and 5, got {0}")]
    DifficultyOutOfRange(u8),
    #[error("`num_required` must not be negative, got {0}")]
    NegativeQuantity(i32),
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

pub(crate) fn require_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}
