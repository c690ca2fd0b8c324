//! Dish type route handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use kitchen_core::{CatalogService, DishType, DishTypeDetail, QueryService};
use log::info;
use serde::Deserialize;
use uuid::Uuid;

use super::{current_cook, json_body, path_id, query_params, ListQuery, ListResponse};
use crate::error::Result;
use crate::extract::CookIdentity;
use crate::state::AppState;

/// Create/update payload.
#[derive(Debug, Deserialize)]
pub struct DishTypeBody {
    pub name: String,
}

/// Paged dish types filtered by `name`.
pub async fn index(
    State(state): State<AppState>,
    identity: CookIdentity,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse<DishType>>> {
    let page_size = state.page_size();
    let query = query_params(query)?;
    let page_number = query.page_number()?;
    let response = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            let service = QueryService::sqlite(conn, page_size)?;
            let page = service.list_dish_types(query.name.as_deref(), page_number)?;
            Ok(ListResponse::new(page, query.name))
        })
        .await?;
    Ok(Json(response))
}

pub async fn create(
    State(state): State<AppState>,
    identity: CookIdentity,
    payload: std::result::Result<Json<DishTypeBody>, JsonRejection>,
) -> Result<(StatusCode, Json<DishType>)> {
    let body = json_body(payload)?;
    let created = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(CatalogService::sqlite(conn)?.create_dish_type(&body.name)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Dish type with its dishes.
pub async fn show(
    State(state): State<AppState>,
    identity: CookIdentity,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DishTypeDetail>> {
    let id = path_id(path)?;
    let page_size = state.page_size();
    let detail = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(QueryService::sqlite(conn, page_size)?.get_dish_type_detail(id)?)
        })
        .await?;
    Ok(Json(detail))
}

pub async fn update(
    State(state): State<AppState>,
    identity: CookIdentity,
    path: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<DishTypeBody>, JsonRejection>,
) -> Result<Json<DishType>> {
    let id = path_id(path)?;
    let body = json_body(payload)?;
    let updated = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(CatalogService::sqlite(conn)?.update_dish_type(id, &body.name)?)
        })
        .await?;
    Ok(Json(updated))
}

/// Deletes the dish type together with every dish filed under it.
pub async fn destroy(
    State(state): State<AppState>,
    identity: CookIdentity,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode> {
    let id = path_id(path)?;
    let dishes_removed = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(CatalogService::sqlite(conn)?.delete_dish_type(id)?)
        })
        .await?;
    info!("event=dish_type_deleted module=http status=ok id={id} dishes_removed={dishes_removed}");
    Ok(StatusCode::NO_CONTENT)
}
