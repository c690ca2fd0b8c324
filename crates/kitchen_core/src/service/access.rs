//! Access gate in front of every kitchen use-case.
//!
//! Identity (login, sessions, passwords) is owned by an upstream provider
//! that hands over the current cook id. This gate only checks that the id is
//! present and still names a cook.

use super::error::{ServiceError, ServiceResult};
use crate::model::cook::CookId;
use crate::repo::cook_repo::CookRepository;
use log::info;

/// Resolves the current cook or fails with [`ServiceError::Unauthenticated`].
pub fn authenticate<C: CookRepository>(
    cook_repo: &C,
    current: Option<CookId>,
) -> ServiceResult<CookId> {
    let Some(cook_id) = current else {
        return Err(ServiceError::Unauthenticated);
    };
    match cook_repo.get_cook(cook_id)? {
        Some(cook) => Ok(cook.id),
        None => {
            info!("event=authenticate module=service status=rejected cook_id={cook_id}");
            Err(ServiceError::Unauthenticated)
        }
    }
}
