//! Dish record and price rules.
//!
//! # Invariants
//! - `price` fits `decimal(7, 2)`: at most 2 fractional digits and at most
//!   5 integral digits.
//! - `dish_type_id` references an existing dish type (checked by storage).
//! - `cook_ids` is a set; order carries no meaning.

use super::cook::CookId;
use super::dish_type::DishTypeId;
use super::validation::{require_id, require_text, ValidationError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Stable identifier of a dish.
pub type DishId = Uuid;

/// Maximum name length, in characters.
pub const DISH_NAME_MAX_CHARS: usize = 255;
/// Total significant digits allowed in a price.
pub const PRICE_MAX_DIGITS: u32 = 7;
/// Fractional digits allowed in a price.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Menu item with price, description, category and assigned cooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub dish_type_id: DishTypeId,
    #[serde(default)]
    pub cook_ids: BTreeSet<CookId>,
}

impl Dish {
    /// Creates a dish with a generated stable ID and no assigned cooks.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        dish_type_id: DishTypeId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            price,
            dish_type_id,
            cook_ids: BTreeSet::new(),
        }
    }

    /// Checks field invariants that do not need storage access.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("id", self.id)?;
        require_text("name", &self.name, DISH_NAME_MAX_CHARS)?;
        if self.description.trim().is_empty() {
            return Err(ValidationError::Blank {
                field: "description",
            });
        }
        validate_price(self.price)?;
        require_id("dish_type", self.dish_type_id)?;
        for cook_id in &self.cook_ids {
            require_id("cooks", *cook_id)?;
        }
        Ok(())
    }
}

/// Checks that `price` fits `decimal(7, 2)`.
///
/// Trailing zeros are ignored, so `12.500` is accepted as `12.50`.
pub fn validate_price(price: Decimal) -> Result<(), ValidationError> {
    let normalized = price.normalize();
    if normalized.scale() > PRICE_DECIMAL_PLACES {
        return Err(ValidationError::PriceTooPrecise);
    }

    let integral_limit = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
    if normalized.abs() >= integral_limit {
        return Err(ValidationError::PriceOutOfRange);
    }
    Ok(())
}

/// Converts a validated price to integer cents for storage.
pub fn price_to_cents(price: Decimal) -> Result<i64, ValidationError> {
    validate_price(price)?;
    (price * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .ok_or(ValidationError::PriceOutOfRange)
}

/// Rehydrates a stored price; always carries scale 2 (`250` → `250.00`).
pub fn price_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_DECIMAL_PLACES)
}
