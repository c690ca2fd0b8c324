//! Cook repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `cooks`.
//! - Translate unique-username violations into `RepoError::Conflict`.
//!
//! # Invariants
//! - Listing is sorted by `years_of_experience ASC` (NULL first), then
//!   `username ASC`.
//! - Name filters match first name OR last name.
//! - Deleting a cook removes its dish links in the same transaction.

use super::error::{EntityKind, RepoError, RepoResult};
use super::schema::{ensure_connection_ready, COOKS_TABLE, DISH_COOKS_TABLE};
use super::sql::{
    count_to_u64, is_unique_violation, parse_cook_columns, push_name_filter, COOK_COLUMNS,
    COOK_ORDER,
};
use crate::model::cook::{Cook, CookId};
use crate::model::page::{Page, PageRequest};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction, TransactionBehavior};

/// Repository interface for cook operations.
pub trait CookRepository {
    /// Inserts a cook; a taken username yields `RepoError::Conflict`.
    fn create_cook(&self, cook: &Cook) -> RepoResult<CookId>;
    fn update_cook(&self, cook: &Cook) -> RepoResult<()>;
    fn get_cook(&self, id: CookId) -> RepoResult<Option<Cook>>;
    fn get_cook_by_username(&self, username: &str) -> RepoResult<Option<Cook>>;
    /// Deletes the cook and unassigns it from every dish.
    fn delete_cook(&self, id: CookId) -> RepoResult<()>;
    /// Returns one page of cooks whose first or last name contains `filter`.
    fn page_cooks(&self, filter: Option<&str>, request: PageRequest) -> RepoResult<Page<Cook>>;
    fn count_cooks(&self) -> RepoResult<u64>;
}

/// SQLite-backed cook repository.
pub struct SqliteCookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCookRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[COOKS_TABLE, DISH_COOKS_TABLE])?;
        Ok(Self { conn })
    }

    fn find_one(&self, column: &'static str, value: String) -> RepoResult<Option<Cook>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COOK_COLUMNS} FROM cooks c WHERE c.{column} = ?1;"
        ))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_cook_columns(row)?));
        }
        Ok(None)
    }
}

impl CookRepository for SqliteCookRepository<'_> {
    fn create_cook(&self, cook: &Cook) -> RepoResult<CookId> {
        cook.validate()?;

        self.conn
            .execute(
                "INSERT INTO cooks (
                    id,
                    username,
                    first_name,
                    last_name,
                    years_of_experience
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    cook.id.to_string(),
                    cook.username.as_str(),
                    cook.first_name.as_str(),
                    cook.last_name.as_str(),
                    cook.years_of_experience,
                ],
            )
            .map_err(|err| username_conflict(err, cook))?;

        Ok(cook.id)
    }

    fn update_cook(&self, cook: &Cook) -> RepoResult<()> {
        cook.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE cooks
                 SET
                    username = ?1,
                    first_name = ?2,
                    last_name = ?3,
                    years_of_experience = ?4
                 WHERE id = ?5;",
                params![
                    cook.username.as_str(),
                    cook.first_name.as_str(),
                    cook.last_name.as_str(),
                    cook.years_of_experience,
                    cook.id.to_string(),
                ],
            )
            .map_err(|err| username_conflict(err, cook))?;

        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Cook, cook.id));
        }

        Ok(())
    }

    fn get_cook(&self, id: CookId) -> RepoResult<Option<Cook>> {
        self.find_one("id", id.to_string())
    }

    fn get_cook_by_username(&self, username: &str) -> RepoResult<Option<Cook>> {
        self.find_one("username", username.to_string())
    }

    fn delete_cook(&self, id: CookId) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        tx.execute(
            "DELETE FROM dish_cooks WHERE cook_id = ?1;",
            [id_text.as_str()],
        )?;
        let changed = tx.execute("DELETE FROM cooks WHERE id = ?1;", [id_text.as_str()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Cook, id));
        }

        tx.commit()?;
        Ok(())
    }

    fn page_cooks(&self, filter: Option<&str>, request: PageRequest) -> RepoResult<Page<Cook>> {
        let name_columns = ["c.first_name", "c.last_name"];
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;

        let mut count_sql = String::from("SELECT COUNT(*) FROM cooks c");
        let mut count_binds: Vec<Value> = Vec::new();
        push_name_filter(&mut count_sql, &mut count_binds, &name_columns, filter);
        let total: i64 = tx.query_row(&count_sql, params_from_iter(count_binds), |row| {
            row.get(0)
        })?;

        let mut sql = format!("SELECT {COOK_COLUMNS} FROM cooks c");
        let mut bind_values: Vec<Value> = Vec::new();
        push_name_filter(&mut sql, &mut bind_values, &name_columns, filter);
        sql.push_str(&format!(" ORDER BY {COOK_ORDER} LIMIT ? OFFSET ?"));
        bind_values.push(Value::Integer(request.limit()));
        bind_values.push(Value::Integer(request.offset()));

        let mut items = Vec::new();
        {
            let mut stmt = tx.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            while let Some(row) = rows.next()? {
                items.push(parse_cook_columns(row)?);
            }
        }
        tx.commit()?;

        Ok(Page::new(items, request, count_to_u64(total, "cook")?))
    }

    fn count_cooks(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cooks;", [], |row| row.get(0))?;
        count_to_u64(total, "cook")
    }
}

fn username_conflict(err: rusqlite::Error, cook: &Cook) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::Conflict {
            field: "username",
            value: cook.username.clone(),
        };
    }
    err.into()
}
