//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Several required fields reported together, e.g. "respondentId and rating"
    MissingFields { fields: &'static str },

    /// Numeric value outside its inclusive range
    OutOfRange { field: &'static str, min: i64, max: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::MissingFields { fields } => {
                write!(f, "Missing required fields: {}", fields)
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a bounded text column. Postgres VARCHAR limits count characters, not bytes.
pub(crate) fn bounded(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(trimmed.to_owned())
}
