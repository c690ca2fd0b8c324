//! Dish type (menu category) record.

use super::validation::{require_id, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a dish type.
pub type DishTypeId = Uuid;

/// Maximum name length, in characters.
pub const DISH_TYPE_NAME_MAX_CHARS: usize = 255;

/// Named category grouping dishes, e.g. "Main Course".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishType {
    pub id: DishTypeId,
    pub name: String,
}

impl DishType {
    /// Creates a dish type with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a dish type with a caller-provided ID.
    pub fn with_id(id: DishTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Checks field invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("id", self.id)?;
        require_text("name", &self.name, DISH_TYPE_NAME_MAX_CHARS)
    }
}
