//! Cook route handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use kitchen_core::{CatalogService, Cook, CookDetail, CookInput, QueryService};
use serde::Deserialize;
use uuid::Uuid;

use super::{current_cook, json_body, path_id, query_params, ListQuery, ListResponse};
use crate::error::Result;
use crate::extract::CookIdentity;
use crate::state::AppState;

/// Cook listing parameters; the search box is named `cook` in older clients.
#[derive(Debug, Deserialize)]
pub struct CookListQuery {
    #[serde(alias = "cook")]
    pub name: Option<String>,
    pub page: Option<String>,
}

impl From<CookListQuery> for ListQuery {
    fn from(value: CookListQuery) -> Self {
        Self {
            name: value.name,
            page: value.page,
        }
    }
}

/// Paged cooks whose first or last name matches, by years of experience.
pub async fn index(
    State(state): State<AppState>,
    identity: CookIdentity,
    query: std::result::Result<Query<CookListQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Cook>>> {
    let query = ListQuery::from(query_params(query)?);
    let page_size = state.page_size();
    let page_number = query.page_number()?;
    let response = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            let service = QueryService::sqlite(conn, page_size)?;
            let page = service.list_cooks(query.name.as_deref(), page_number)?;
            Ok(ListResponse::new(page, query.name))
        })
        .await?;
    Ok(Json(response))
}

pub async fn create(
    State(state): State<AppState>,
    identity: CookIdentity,
    payload: std::result::Result<Json<CookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Cook>)> {
    let input = json_body(payload)?;
    let created = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(CatalogService::sqlite(conn)?.create_cook(input)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Cook with the dishes they are assigned to.
pub async fn show(
    State(state): State<AppState>,
    identity: CookIdentity,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CookDetail>> {
    let id = path_id(path)?;
    let page_size = state.page_size();
    let detail = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(QueryService::sqlite(conn, page_size)?.get_cook_detail(id)?)
        })
        .await?;
    Ok(Json(detail))
}

pub async fn update(
    State(state): State<AppState>,
    identity: CookIdentity,
    path: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<CookInput>, JsonRejection>,
) -> Result<Json<Cook>> {
    let id = path_id(path)?;
    let input = json_body(payload)?;
    let updated = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            Ok(CatalogService::sqlite(conn)?.update_cook(id, input)?)
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
            Ok(CatalogService::sqlite(conn)?.delete_cook(id)?)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
