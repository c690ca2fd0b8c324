//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                              - Overview counters
//! GET    /health                        - Liveness check (no auth)
//!
//! # Dish types
//! GET    /dish-types?name=&page=        - Paged listing
//! POST   /dish-types                    - Create
//! GET    /dish-types/{id}               - Detail with dishes
//! PUT    /dish-types/{id}               - Update
//! DELETE /dish-types/{id}               - Delete with all its dishes
//!
//! # Dishes
//! GET    /dishes?name=&page=            - Paged listing with type and cooks
//! POST   /dishes                        - Create
//! GET    /dishes/{id}                   - Detail
//! PUT    /dishes/{id}                   - Update
//! DELETE /dishes/{id}                   - Delete
//! POST   /dishes/{id}/toggle-assignment - Toggle the current cook
//!
//! # Cooks
//! GET    /cooks?name=&page=             - Paged listing (`cook=` alias)
//! POST   /cooks                         - Create
//! GET    /cooks/{id}                    - Detail with dishes
//! PUT    /cooks/{id}                    - Update
//! DELETE /cooks/{id}                    - Delete
//! ```
//!
//! Every route except `/health` requires the `x-cook-id` header to name an
//! existing cook.

pub mod cooks;
pub mod dish_types;
pub mod dishes;
pub mod index;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    middleware,
    routing::{get, post},
    Json, Router,
};
use kitchen_core::repo::cook_repo::SqliteCookRepository;
use kitchen_core::{authenticate, CookId, Page};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::extract::CookIdentity;
use crate::middleware::log_requests;
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::overview))
        .route("/health", get(index::health))
        .nest("/dish-types", dish_type_routes())
        .nest("/dishes", dish_routes())
        .nest("/cooks", cook_routes())
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Create the dish type routes router.
pub fn dish_type_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dish_types::index).post(dish_types::create))
        .route(
            "/{id}",
            get(dish_types::show)
                .put(dish_types::update)
                .delete(dish_types::destroy),
        )
}

/// Create the dish routes router.
pub fn dish_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dishes::index).post(dishes::create))
        .route(
            "/{id}",
            get(dishes::show).put(dishes::update).delete(dishes::destroy),
        )
        .route("/{id}/toggle-assignment", post(dishes::toggle_assignment))
}

/// Create the cook routes router.
pub fn cook_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cooks::index).post(cooks::create))
        .route(
            "/{id}",
            get(cooks::show).put(cooks::update).delete(cooks::destroy),
        )
}

// =============================================================================
// Shared request/response shapes
// =============================================================================

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    /// Raw so that a non-numeric value becomes a field-level error.
    pub page: Option<String>,
}

/// Echo of the search form so clients can re-render it.
#[derive(Debug, Serialize)]
pub struct SearchForm {
    pub name: String,
}

/// Paged listing envelope.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub num_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub search_form: SearchForm,
}

impl<T> ListResponse<T> {
    pub fn new(page: Page<T>, name: Option<String>) -> Self {
        Self {
            num_pages: page.num_pages(),
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            page,
            search_form: SearchForm {
                name: name.unwrap_or_default(),
            },
        }
    }
}

impl ListQuery {
    /// 1-indexed page number; absent or blank means the first page.
    pub fn page_number(&self) -> Result<u32> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| ApiError::bad_request("page", "page must be a positive number")),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Resolves the current cook or fails with `401`.
pub(crate) fn current_cook(conn: &Connection, identity: CookIdentity) -> Result<CookId> {
    let cooks = SqliteCookRepository::try_new(conn)?;
    Ok(authenticate(&cooks, identity.0)?)
}

pub(crate) fn path_id(path: std::result::Result<Path<Uuid>, PathRejection>) -> Result<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|err| ApiError::bad_request("id", err.body_text()))
}

pub(crate) fn query_params<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query
        .map(|Query(params)| params)
        .map_err(|err| ApiError::bad_request("query", err.body_text()))
}

pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|err| ApiError::bad_request("body", err.body_text()))
}
