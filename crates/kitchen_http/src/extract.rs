//! Request extractors.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use kitchen_core::CookId;
use uuid::Uuid;

/// Header carrying the current cook id, set by the upstream identity provider.
pub const COOK_ID_HEADER: &str = "x-cook-id";

/// Cook id claimed by the request, if any.
///
/// Extraction never fails; a missing or malformed header yields `None` and
/// the access gate turns that into `401 Unauthorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookIdentity(pub Option<CookId>);

impl<S> FromRequestParts<S> for CookIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let cook_id = parts
            .headers
            .get(COOK_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok());
        Ok(Self(cook_id))
    }
}
