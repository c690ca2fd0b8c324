//! Dish type repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `dish_types`.
//! - Own the cascading delete of a dish type and its dishes.
//!
//! # Invariants
//! - Listing is sorted by `name ASC, id ASC`.
//! - Deleting a dish type removes its dishes and their cook links in the same
//!   transaction; no dish is ever left pointing at a missing type.

use super::error::{EntityKind, RepoError, RepoResult};
use super::schema::{ensure_connection_ready, DISHES_TABLE, DISH_COOKS_TABLE, DISH_TYPES_TABLE};
use super::sql::{count_to_u64, parse_uuid, push_name_filter, row_exists};
use crate::model::dish_type::{DishType, DishTypeId};
use crate::model::page::{Page, PageRequest};
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};

const DISH_TYPE_SELECT_SQL: &str = "SELECT id, name FROM dish_types";

/// Repository interface for dish type operations.
pub trait DishTypeRepository {
    fn create_dish_type(&self, dish_type: &DishType) -> RepoResult<DishTypeId>;
    fn update_dish_type(&self, dish_type: &DishType) -> RepoResult<()>;
    fn get_dish_type(&self, id: DishTypeId) -> RepoResult<Option<DishType>>;
    /// Deletes the dish type and every dish referencing it.
    ///
    /// Returns the number of dishes removed.
    fn delete_dish_type(&self, id: DishTypeId) -> RepoResult<u64>;
    /// Returns one page of dish types whose name contains `filter`.
    fn page_dish_types(
        &self,
        filter: Option<&str>,
        request: PageRequest,
    ) -> RepoResult<Page<DishType>>;
    fn count_dish_types(&self) -> RepoResult<u64>;
}

/// SQLite-backed dish type repository.
pub struct SqliteDishTypeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDishTypeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[DISH_TYPES_TABLE, DISHES_TABLE, DISH_COOKS_TABLE])?;
        Ok(Self { conn })
    }
}

impl DishTypeRepository for SqliteDishTypeRepository<'_> {
    fn create_dish_type(&self, dish_type: &DishType) -> RepoResult<DishTypeId> {
        dish_type.validate()?;

        self.conn.execute(
            "INSERT INTO dish_types (id, name) VALUES (?1, ?2);",
            params![dish_type.id.to_string(), dish_type.name.as_str()],
        )?;

        Ok(dish_type.id)
    }

    fn update_dish_type(&self, dish_type: &DishType) -> RepoResult<()> {
        dish_type.validate()?;

        let changed = self.conn.execute(
            "UPDATE dish_types SET name = ?1 WHERE id = ?2;",
            params![dish_type.name.as_str(), dish_type.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::DishType, dish_type.id));
        }

        Ok(())
    }

    fn get_dish_type(&self, id: DishTypeId) -> RepoResult<Option<DishType>> {
        let row = self
            .conn
            .query_row(
                &format!("{DISH_TYPE_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| Ok((row.get::<_, String>("id")?, row.get::<_, String>("name")?)),
            )
            .optional()?;

        row.map(|(id_text, name)| build_dish_type(&id_text, name))
            .transpose()
    }

    fn delete_dish_type(&self, id: DishTypeId) -> RepoResult<u64> {
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if !row_exists(&tx, "dish_types", &id_text)? {
            return Err(RepoError::not_found(EntityKind::DishType, id));
        }

        tx.execute(
            "DELETE FROM dish_cooks
             WHERE dish_id IN (SELECT id FROM dishes WHERE dish_type_id = ?1);",
            [id_text.as_str()],
        )?;
        let dishes_removed = tx.execute(
            "DELETE FROM dishes WHERE dish_type_id = ?1;",
            [id_text.as_str()],
        )?;
        tx.execute("DELETE FROM dish_types WHERE id = ?1;", [id_text.as_str()])?;

        tx.commit()?;
        Ok(dishes_removed as u64)
    }

    fn page_dish_types(
        &self,
        filter: Option<&str>,
        request: PageRequest,
    ) -> RepoResult<Page<DishType>> {
        // Deferred read transaction: count and slice see one snapshot.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;

        let mut count_sql = String::from("SELECT COUNT(*) FROM dish_types");
        let mut count_binds: Vec<Value> = Vec::new();
        push_name_filter(&mut count_sql, &mut count_binds, &["name"], filter);
        let total: i64 = tx.query_row(&count_sql, params_from_iter(count_binds), |row| {
            row.get(0)
        })?;

        let mut sql = String::from(DISH_TYPE_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();
        push_name_filter(&mut sql, &mut bind_values, &["name"], filter);
        sql.push_str(" ORDER BY name ASC, id ASC LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(request.limit()));
        bind_values.push(Value::Integer(request.offset()));

        let mut items = Vec::new();
        {
            let mut stmt = tx.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            while let Some(row) = rows.next()? {
                items.push(parse_dish_type_row(row)?);
            }
        }
        tx.commit()?;

        Ok(Page::new(items, request, count_to_u64(total, "dish type")?))
    }

    fn count_dish_types(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dish_types;", [], |row| row.get(0))?;
        count_to_u64(total, "dish type")
    }
}

fn parse_dish_type_row(row: &Row<'_>) -> RepoResult<DishType> {
    let id_text: String = row.get("id")?;
    build_dish_type(&id_text, row.get("name")?)
}

fn build_dish_type(id_text: &str, name: String) -> RepoResult<DishType> {
    let dish_type = DishType {
        id: parse_uuid(id_text, "dish_types.id")?,
        name,
    };
    dish_type.validate()?;
    Ok(dish_type)
}
