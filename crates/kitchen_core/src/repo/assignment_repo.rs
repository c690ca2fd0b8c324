//! Dish↔cook assignment repository.
//!
//! # Responsibility
//! - Own membership checks and the toggle transition on `dish_cooks`.
//!
//! # Invariants
//! - A (cook, dish) pair is either ABSENT or PRESENT; toggle flips it.
//! - Toggle reads and writes inside one IMMEDIATE transaction, so two
//!   concurrent toggles of the same pair serialize instead of interleaving.

use super::error::{EntityKind, RepoError, RepoResult};
use super::schema::{ensure_connection_ready, COOKS_TABLE, DISHES_TABLE, DISH_COOKS_TABLE};
use super::sql::row_exists;
use crate::model::cook::CookId;
use crate::model::dish::DishId;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

/// Repository interface for dish↔cook membership.
pub trait AssignmentRepository {
    fn is_assigned(&self, cook_id: CookId, dish_id: DishId) -> RepoResult<bool>;
    /// Flips membership and returns whether the cook is now assigned.
    fn toggle_assignment(&self, cook_id: CookId, dish_id: DishId) -> RepoResult<bool>;
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[COOKS_TABLE, DISHES_TABLE, DISH_COOKS_TABLE])?;
        Ok(Self { conn })
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn is_assigned(&self, cook_id: CookId, dish_id: DishId) -> RepoResult<bool> {
        pair_exists(self.conn, &cook_id.to_string(), &dish_id.to_string())
    }

    fn toggle_assignment(&self, cook_id: CookId, dish_id: DishId) -> RepoResult<bool> {
        let cook_text = cook_id.to_string();
        let dish_text = dish_id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if !row_exists(&tx, "cooks", &cook_text)? {
            return Err(RepoError::not_found(EntityKind::Cook, cook_id));
        }
        if !row_exists(&tx, "dishes", &dish_text)? {
            return Err(RepoError::not_found(EntityKind::Dish, dish_id));
        }

        let now_assigned = if pair_exists(&tx, &cook_text, &dish_text)? {
            tx.execute(
                "DELETE FROM dish_cooks WHERE dish_id = ?1 AND cook_id = ?2;",
                params![dish_text.as_str(), cook_text.as_str()],
            )?;
            false
        } else {
            tx.execute(
                "INSERT INTO dish_cooks (dish_id, cook_id) VALUES (?1, ?2);",
                params![dish_text.as_str(), cook_text.as_str()],
            )?;
            true
        };

        tx.commit()?;
        Ok(now_assigned)
    }
}

fn pair_exists(conn: &Connection, cook_id: &str, dish_id: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM dish_cooks
            WHERE dish_id = ?1 AND cook_id = ?2
        );",
        [dish_id, cook_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
