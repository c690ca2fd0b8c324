//! Field-level validation errors.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Rejected input, always tied to the offending field name so callers can
/// render it next to the right form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier is the nil UUID.
    NilId { field: &'static str },
    /// Required text is empty after trimming.
    Blank { field: &'static str },
    /// Text exceeds the column limit (in characters).
    TooLong { field: &'static str, max_chars: usize },
    /// Username contains characters other than letters, digits and `@.+-_`.
    InvalidUsername,
    /// Price has more than 2 fractional digits.
    PriceTooPrecise,
    /// Price needs more than 7 digits in total.
    PriceOutOfRange,
    /// Years of experience is negative.
    NegativeExperience,
    /// Referenced record does not exist.
    UnknownReference { field: &'static str, id: Uuid },
    /// Page numbers start at 1.
    InvalidPage,
}

impl ValidationError {
    /// Name of the input field this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NilId { field }
            | Self::Blank { field }
            | Self::TooLong { field, .. }
            | Self::UnknownReference { field, .. } => field,
            Self::InvalidUsername => "username",
            Self::PriceTooPrecise | Self::PriceOutOfRange => "price",
            Self::NegativeExperience => "years_of_experience",
            Self::InvalidPage => "page",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId { field } => write!(f, "{field} must not be the nil uuid"),
            Self::Blank { field } => write!(f, "{field} is required"),
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} must have at most {max_chars} characters")
            }
            Self::InvalidUsername => write!(
                f,
                "username may contain only letters, digits and @/./+/-/_ characters"
            ),
            Self::PriceTooPrecise => write!(f, "price must have at most 2 decimal places"),
            Self::PriceOutOfRange => write!(f, "price must have at most 7 digits in total"),
            Self::NegativeExperience => write!(f, "years_of_experience must not be negative"),
            Self::UnknownReference { field, id } => {
                write!(f, "{field} references an unknown record: {id}")
            }
            Self::InvalidPage => write!(f, "page must be 1 or greater"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects blank text and text longer than `max_chars` characters.
pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    limit_text(field, value, max_chars)
}

/// Rejects text longer than `max_chars` characters; empty text is fine.
pub(crate) fn limit_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max_chars {
        return Err(ValidationError::TooLong { field, max_chars });
    }
    Ok(())
}

pub(crate) fn require_id(field: &'static str, id: Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{limit_text, require_text, ValidationError};

    #[test]
    fn require_text_rejects_whitespace_only() {
        assert_eq!(
            require_text("name", "   ", 10),
            Err(ValidationError::Blank { field: "name" })
        );
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        assert!(limit_text("name", "ééééé", 5).is_ok());
        assert_eq!(
            limit_text("name", "éééééé", 5),
            Err(ValidationError::TooLong {
                field: "name",
                max_chars: 5
            })
        );
    }

    #[test]
    fn every_variant_reports_its_field() {
        assert_eq!(ValidationError::PriceTooPrecise.field(), "price");
        assert_eq!(ValidationError::InvalidUsername.field(), "username");
        assert_eq!(ValidationError::InvalidPage.field(), "page");
        assert_eq!(
            ValidationError::Blank {
                field: "description"
            }
            .field(),
            "description"
        );
    }
}
