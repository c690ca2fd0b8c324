//! Read-side kitchen use-cases.
//!
//! # Responsibility
//! - Filtered, paged listings of dish types, dishes and cooks.
//! - Detail views joining each record with its related records.
//! - Overview counters for the landing page.
//!
//! # Invariants
//! - Filters are trimmed; a blank filter returns the full list.
//! - Every list uses the page size this service was built with.
//! - Absent ids yield `ServiceError::NotFound`, never an empty detail.

use super::error::{ServiceError, ServiceResult};
use super::normalize_filter;
use crate::model::cook::{Cook, CookId};
use crate::model::dish::DishId;
use crate::model::dish_type::{DishType, DishTypeId};
use crate::model::page::{normalize_page_size, Page, PageRequest};
use crate::repo::cook_repo::{CookRepository, SqliteCookRepository};
use crate::repo::dish_repo::{DishRecord, DishRepository, SqliteDishRepository};
use crate::repo::dish_type_repo::{DishTypeRepository, SqliteDishTypeRepository};
use crate::repo::{EntityKind, RepoResult};
use rusqlite::Connection;
use serde::Serialize;

/// Dish type with every dish filed under it, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DishTypeDetail {
    pub dish_type: DishType,
    pub dishes: Vec<DishRecord>,
}

/// Cook with the dishes they are assigned to, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookDetail {
    pub cook: Cook,
    pub dishes: Vec<DishRecord>,
}

/// Landing page counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KitchenOverview {
    pub num_dish_types: u64,
    pub num_dishes: u64,
    pub num_cooks: u64,
}

/// Read-only facade over the three entity repositories.
pub struct QueryService<T, D, C> {
    dish_types: T,
    dishes: D,
    cooks: C,
    page_size: u32,
}

impl<'conn>
    QueryService<
        SqliteDishTypeRepository<'conn>,
        SqliteDishRepository<'conn>,
        SqliteCookRepository<'conn>,
    >
{
    /// Builds a service over SQLite repositories sharing one connection.
    pub fn sqlite(conn: &'conn Connection, page_size: u32) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteDishTypeRepository::try_new(conn)?,
            SqliteDishRepository::try_new(conn)?,
            SqliteCookRepository::try_new(conn)?,
            page_size,
        ))
    }
}

impl<T, D, C> QueryService<T, D, C>
where
    T: DishTypeRepository,
    D: DishRepository,
    C: CookRepository,
{
    /// `page_size` is normalized: 0 becomes the default, larger than the
    /// maximum is clamped.
    pub fn new(dish_types: T, dishes: D, cooks: C, page_size: u32) -> Self {
        Self {
            dish_types,
            dishes,
            cooks,
            page_size: normalize_page_size(Some(page_size)),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Lists dish types whose name contains `name_filter`, sorted by name.
    pub fn list_dish_types(
        &self,
        name_filter: Option<&str>,
        page: u32,
    ) -> ServiceResult<Page<DishType>> {
        let request = self.page_request(page)?;
        Ok(self
            .dish_types
            .page_dish_types(normalize_filter(name_filter), request)?)
    }

    /// Lists dishes whose name contains `name_filter`, with type and cooks.
    pub fn list_dishes(
        &self,
        name_filter: Option<&str>,
        page: u32,
    ) -> ServiceResult<Page<DishRecord>> {
        let request = self.page_request(page)?;
        Ok(self
            .dishes
            .page_dishes(normalize_filter(name_filter), request)?)
    }

    /// Lists cooks whose first or last name contains `name_filter`, sorted
    /// by years of experience.
    pub fn list_cooks(&self, name_filter: Option<&str>, page: u32) -> ServiceResult<Page<Cook>> {
        let request = self.page_request(page)?;
        Ok(self
            .cooks
            .page_cooks(normalize_filter(name_filter), request)?)
    }

    pub fn get_dish_type_detail(&self, id: DishTypeId) -> ServiceResult<DishTypeDetail> {
        let dish_type = self
            .dish_types
            .get_dish_type(id)?
            .ok_or(ServiceError::NotFound {
                entity: EntityKind::DishType,
                id,
            })?;
        let dishes = self.dishes.list_dishes_by_type(id)?;
        Ok(DishTypeDetail { dish_type, dishes })
    }

    pub fn get_dish_detail(&self, id: DishId) -> ServiceResult<DishRecord> {
        self.dishes.get_dish(id)?.ok_or(ServiceError::NotFound {
            entity: EntityKind::Dish,
            id,
        })
    }

    pub fn get_cook_detail(&self, id: CookId) -> ServiceResult<CookDetail> {
        let cook = self.cooks.get_cook(id)?.ok_or(ServiceError::NotFound {
            entity: EntityKind::Cook,
            id,
        })?;
        let dishes = self.dishes.list_dishes_by_cook(id)?;
        Ok(CookDetail { cook, dishes })
    }

    /// Looks a cook up by exact (trimmed) username.
    pub fn find_cook_by_username(&self, username: &str) -> ServiceResult<Option<Cook>> {
        Ok(self.cooks.get_cook_by_username(username.trim())?)
    }

    pub fn overview(&self) -> ServiceResult<KitchenOverview> {
        Ok(KitchenOverview {
            num_dish_types: self.dish_types.count_dish_types()?,
            num_dishes: self.dishes.count_dishes()?,
            num_cooks: self.cooks.count_cooks()?,
        })
    }

    fn page_request(&self, page: u32) -> ServiceResult<PageRequest> {
        Ok(PageRequest::new(page, Some(self.page_size))?)
    }
}
