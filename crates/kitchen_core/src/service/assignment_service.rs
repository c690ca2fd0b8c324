//! Toggle a cook's membership in a dish's cook set.

use super::error::ServiceResult;
use crate::model::cook::CookId;
use crate::model::dish::DishId;
use crate::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use crate::repo::RepoResult;
use log::{info, warn};
use rusqlite::Connection;
use serde::Serialize;

/// Membership state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub now_assigned: bool,
}

/// Assignment use-case facade.
pub struct AssignmentService<R: AssignmentRepository> {
    repo: R,
}

impl<'conn> AssignmentService<SqliteAssignmentRepository<'conn>> {
    pub fn sqlite(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(SqliteAssignmentRepository::try_new(conn)?))
    }
}

impl<R: AssignmentRepository> AssignmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn is_assigned(&self, cook_id: CookId, dish_id: DishId) -> ServiceResult<bool> {
        Ok(self.repo.is_assigned(cook_id, dish_id)?)
    }

    /// Adds the cook to the dish when absent, removes it when present.
    ///
    /// Fails with `NotFound` (and changes nothing) when either id does not
    /// resolve.
    pub fn toggle_assignment(
        &self,
        cook_id: CookId,
        dish_id: DishId,
    ) -> ServiceResult<ToggleOutcome> {
        match self.repo.toggle_assignment(cook_id, dish_id) {
            Ok(now_assigned) => {
                info!(
                    "event=toggle_assignment module=service status=ok cook_id={cook_id} dish_id={dish_id} now_assigned={now_assigned}"
                );
                Ok(ToggleOutcome { now_assigned })
            }
            Err(err) => {
                warn!(
                    "event=toggle_assignment module=service status=error cook_id={cook_id} dish_id={dish_id} error={err}"
                );
                Err(err.into())
            }
        }
    }
}
