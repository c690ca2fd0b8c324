//! Dish route handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use kitchen_core::{
    AssignmentService, CatalogService, DishInput, DishRecord, QueryService, ToggleOutcome,
};
use uuid::Uuid;

use super::{current_cook, json_body, path_id, query_params, ListQuery, ListResponse};
use crate::error::Result;
use crate::extract::CookIdentity;
use crate::state::AppState;

/// Paged dishes filtered by `name`, each with its type and cooks.
pub async fn index(
    State(state): State<AppState>,
    identity: CookIdentity,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse<DishRecord>>> {
    let page_size = state.page_size();
    let query = query_params(query)?;
    let page_number = query.page_number()?;
    let response = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            let service = QueryService::sqlite(conn, page_size)?;
            let page = service.list_dishes(query.name.as_deref(), page_number)?;
            Ok(ListResponse::new(page, query.name))
        })
        .await?;
    Ok(Json(response))
}

pub async fn create(
    State(state): State<AppState>,
    identity: CookIdentity,
    payload: std::result::Result<Json<DishInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DishRecord>)> {
    let input = json_body(payload)?;
    let created = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(CatalogService::sqlite(conn)?.create_dish(input)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn show(
    State(state): State<AppState>,
    identity: CookIdentity,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DishRecord>> {
    let id = path_id(path)?;
    let page_size = state.page_size();
    let record = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(QueryService::sqlite(conn, page_size)?.get_dish_detail(id)?)
        })
        .await?;
    Ok(Json(record))
}

/// Replaces every field, including the full cook set.
pub async fn update(
    State(state): State<AppState>,
    identity: CookIdentity,
    path: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<DishInput>, JsonRejection>,
) -> Result<Json<DishRecord>> {
    let id = path_id(path)?;
    let input = json_body(payload)?;
    let updated = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(CatalogService::sqlite(conn)?.update_dish(id, input)?)
        })
        .await?;
    Ok(Json(updated))
}

pub async fn destroy(
    State(state): State<AppState>,
    identity: CookIdentity,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode> {
    let id = path_id(path)?;
    state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(CatalogService::sqlite(conn)?.delete_dish(id)?)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adds the current cook to the dish, or removes them if already assigned.
pub async fn toggle_assignment(
    State(state): State<AppState>,
    identity: CookIdentity,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ToggleOutcome>> {
    let dish_id = path_id(path)?;
    let outcome = state
        .with_connection(move |conn| {
            let cook_id = current_cook(conn, identity)?;
            Ok(AssignmentService::sqlite(conn)?.toggle_assignment(cook_id, dish_id)?)
        })
        .await?;
    Ok(Json(outcome))
}
