//! Landing page and health check.

use axum::{extract::State, Json};
use kitchen_core::{KitchenOverview, QueryService};
use serde::Serialize;

use super::current_cook;
use crate::error::Result;
use crate::extract::CookIdentity;
use crate::state::AppState;

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness health check endpoint.
///
/// Does not touch the database and requires no identity.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: kitchen_core::ping(),
        version: kitchen_core::core_version(),
    })
}

/// Counts of dish types, dishes and cooks.
pub async fn overview(
    State(state): State<AppState>,
    identity: CookIdentity,
) -> Result<Json<KitchenOverview>> {
    let page_size = state.page_size();
    let overview = state
        .with_connection(move |conn| {
            current_cook(conn, identity)?;
            let query = QueryService::sqlite(conn, page_size)?;
            Ok(query.overview()?)
        })
        .await?;
    Ok(Json(overview))
}
