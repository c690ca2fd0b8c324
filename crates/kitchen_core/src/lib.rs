//! Core domain logic for the kitchen staff service.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_dir, default_log_level, init_logging, logging_status, LoggingError};
pub use model::cook::{Cook, CookId};
pub use model::dish::{Dish, DishId};
pub use model::dish_type::{DishType, DishTypeId};
pub use model::page::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use model::validation::ValidationError;
pub use repo::dish_repo::DishRecord;
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::access::authenticate;
pub use service::assignment_service::{AssignmentService, ToggleOutcome};
pub use service::catalog_service::{CatalogService, CookInput, DishInput};
pub use service::query_service::{CookDetail, DishTypeDetail, KitchenOverview, QueryService};
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
