//! Write-side kitchen use-cases.
//!
//! # Responsibility
//! - Create, update and delete dish types, dishes and cooks.
//! - Trim free-text input before validation and persistence.
//! - Emit one `event=<op> module=catalog` log line per write.
//!
//! # Invariants
//! - Updates replace every field (dishes: including the full cook set).
//! - Deleting a dish type deletes its dishes; the count is returned.
//! - A duplicate username fails with `Conflict` and writes nothing.

use super::error::{ServiceError, ServiceResult};
use crate::model::cook::{Cook, CookId};
use crate::model::dish::{Dish, DishId};
use crate::model::dish_type::{DishType, DishTypeId};
use crate::repo::cook_repo::{CookRepository, SqliteCookRepository};
use crate::repo::dish_repo::{DishRecord, DishRepository, SqliteDishRepository};
use crate::repo::dish_type_repo::{DishTypeRepository, SqliteDishTypeRepository};
use crate::repo::RepoResult;
use log::{info, warn};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Instant;
use uuid::Uuid;

/// Editable dish fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DishInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub dish_type_id: DishTypeId,
    /// Full cook set; replaces any previous assignment on update.
    #[serde(default)]
    pub cook_ids: BTreeSet<CookId>,
}

impl DishInput {
    fn into_dish(self, id: DishId) -> Dish {
        Dish {
            id,
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price,
            dish_type_id: self.dish_type_id,
            cook_ids: self.cook_ids,
        }
    }
}

/// Editable cook profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CookInput {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub years_of_experience: Option<i32>,
}

impl CookInput {
    fn into_cook(self, id: CookId) -> Cook {
        Cook {
            id,
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            years_of_experience: self.years_of_experience,
        }
    }
}

/// Write facade over the three entity repositories.
pub struct CatalogService<T, D, C> {
    dish_types: T,
    dishes: D,
    cooks: C,
}

impl<'conn>
    CatalogService<
        SqliteDishTypeRepository<'conn>,
        SqliteDishRepository<'conn>,
        SqliteCookRepository<'conn>,
    >
{
    /// Builds a service over SQLite repositories sharing one connection.
    pub fn sqlite(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteDishTypeRepository::try_new(conn)?,
            SqliteDishRepository::try_new(conn)?,
            SqliteCookRepository::try_new(conn)?,
        ))
    }
}

impl<T, D, C> CatalogService<T, D, C>
where
    T: DishTypeRepository,
    D: DishRepository,
    C: CookRepository,
{
    pub fn new(dish_types: T, dishes: D, cooks: C) -> Self {
        Self {
            dish_types,
            dishes,
            cooks,
        }
    }

    pub fn create_dish_type(&self, name: &str) -> ServiceResult<DishType> {
        let started_at = Instant::now();
        let dish_type = DishType::new(name.trim());
        let result = self
            .dish_types
            .create_dish_type(&dish_type)
            .map(|_| dish_type)
            .map_err(ServiceError::from);
        log_write("create_dish_type", result, started_at, |value| value.id)
    }

    pub fn update_dish_type(&self, id: DishTypeId, name: &str) -> ServiceResult<DishType> {
        let started_at = Instant::now();
        let dish_type = DishType::with_id(id, name.trim());
        let result = self
            .dish_types
            .update_dish_type(&dish_type)
            .map(|()| dish_type)
            .map_err(ServiceError::from);
        log_write("update_dish_type", result, started_at, |value| value.id)
    }

    /// Deletes the dish type and every dish in it; returns the dish count.
    pub fn delete_dish_type(&self, id: DishTypeId) -> ServiceResult<u64> {
        let started_at = Instant::now();
        let result = self
            .dish_types
            .delete_dish_type(id)
            .map_err(ServiceError::from);
        log_write("delete_dish_type", result, started_at, |_| id)
    }

    pub fn create_dish(&self, input: DishInput) -> ServiceResult<DishRecord> {
        let started_at = Instant::now();
        let dish = input.into_dish(Uuid::new_v4());
        let result = self
            .dishes
            .create_dish(&dish)
            .map_err(ServiceError::from)
            .and_then(|id| self.read_back_dish(id, "created dish not found in read-back"));
        log_write("create_dish", result, started_at, |record| record.dish.id)
    }

    /// Replaces every field and the full cook set of an existing dish.
    pub fn update_dish(&self, id: DishId, input: DishInput) -> ServiceResult<DishRecord> {
        let started_at = Instant::now();
        let dish = input.into_dish(id);
        let result = self
            .dishes
            .update_dish(&dish)
            .map_err(ServiceError::from)
            .and_then(|()| self.read_back_dish(id, "updated dish not found in read-back"));
        log_write("update_dish", result, started_at, |record| record.dish.id)
    }

    pub fn delete_dish(&self, id: DishId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.dishes.delete_dish(id).map_err(ServiceError::from);
        log_write("delete_dish", result, started_at, |_| id)
    }

    pub fn create_cook(&self, input: CookInput) -> ServiceResult<Cook> {
        let started_at = Instant::now();
        let cook = input.into_cook(Uuid::new_v4());
        let result = self
            .cooks
            .create_cook(&cook)
            .map(|_| cook)
            .map_err(ServiceError::from);
        log_write("create_cook", result, started_at, |value| value.id)
    }

    pub fn update_cook(&self, id: CookId, input: CookInput) -> ServiceResult<Cook> {
        let started_at = Instant::now();
        let cook = input.into_cook(id);
        let result = self
            .cooks
            .update_cook(&cook)
            .map(|()| cook)
            .map_err(ServiceError::from);
        log_write("update_cook", result, started_at, |value| value.id)
    }

    /// Deletes the cook and removes them from every dish.
    pub fn delete_cook(&self, id: CookId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.cooks.delete_cook(id).map_err(ServiceError::from);
        log_write("delete_cook", result, started_at, |_| id)
    }

    fn read_back_dish(&self, id: DishId, details: &'static str) -> ServiceResult<DishRecord> {
        self.dishes
            .get_dish(id)?
            .ok_or(ServiceError::InconsistentState(details))
    }
}

fn log_write<T>(
    event: &'static str,
    result: ServiceResult<T>,
    started_at: Instant,
    id_of: impl FnOnce(&T) -> Uuid,
) -> ServiceResult<T> {
    match &result {
        Ok(value) => info!(
            "event={event} module=catalog status=ok id={} duration_ms={}",
            id_of(value),
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event={event} module=catalog status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.kind(),
            err
        ),
    }
    result
}
