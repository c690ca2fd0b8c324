//! Dish repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `dishes` together with their cook links.
//! - Resolve each dish's type and cooks for list/detail read models.
//!
//! # Invariants
//! - Dish rows and their `dish_cooks` links are written in one transaction.
//! - `dish_type_id` and every cook id are checked inside that transaction.
//! - Listing is sorted by `name ASC, id ASC`; cooks of a page are loaded with
//!   one batched query, never one query per dish.

use super::error::{EntityKind, RepoError, RepoResult};
use super::schema::{
    ensure_connection_ready, COOKS_TABLE, DISHES_TABLE, DISH_COOKS_TABLE, DISH_TYPES_TABLE,
};
use super::sql::{
    count_to_u64, parse_cook_columns, parse_uuid, push_name_filter, row_exists, COOK_COLUMNS,
    COOK_ORDER,
};
use crate::model::cook::{Cook, CookId};
use crate::model::dish::{price_from_cents, price_to_cents, Dish, DishId};
use crate::model::dish_type::{DishType, DishTypeId};
use crate::model::page::{Page, PageRequest};
use crate::model::validation::ValidationError;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

const DISH_SELECT_SQL: &str = "SELECT
    d.id AS id,
    d.name AS name,
    d.description AS description,
    d.price_cents AS price_cents,
    d.dish_type_id AS dish_type_id,
    t.name AS dish_type_name
FROM dishes d
INNER JOIN dish_types t ON t.id = d.dish_type_id";

const DISH_ORDER: &str = " ORDER BY d.name ASC, d.id ASC";

/// Upper bound of ids bound into one `IN (...)` list.
const MAX_IDS_PER_QUERY: usize = 500;

/// Read model for dish list/detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DishRecord {
    #[serde(flatten)]
    pub dish: Dish,
    /// Resolved category.
    pub dish_type: DishType,
    /// Assigned cooks, sorted by years of experience.
    pub cooks: Vec<Cook>,
}

/// Repository interface for dish operations.
pub trait DishRepository {
    /// Inserts the dish and links `dish.cook_ids`.
    fn create_dish(&self, dish: &Dish) -> RepoResult<DishId>;
    /// Replaces all fields and the full cook set.
    fn update_dish(&self, dish: &Dish) -> RepoResult<()>;
    fn get_dish(&self, id: DishId) -> RepoResult<Option<DishRecord>>;
    /// Deletes the dish and its cook links.
    fn delete_dish(&self, id: DishId) -> RepoResult<()>;
    /// Returns one page of dishes whose name contains `filter`.
    fn page_dishes(
        &self,
        filter: Option<&str>,
        request: PageRequest,
    ) -> RepoResult<Page<DishRecord>>;
    fn list_dishes_by_type(&self, dish_type_id: DishTypeId) -> RepoResult<Vec<DishRecord>>;
    fn list_dishes_by_cook(&self, cook_id: CookId) -> RepoResult<Vec<DishRecord>>;
    fn count_dishes(&self) -> RepoResult<u64>;
}

/// SQLite-backed dish repository.
pub struct SqliteDishRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDishRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[DISH_TYPES_TABLE, DISHES_TABLE, COOKS_TABLE, DISH_COOKS_TABLE],
        )?;
        Ok(Self { conn })
    }
}

impl DishRepository for SqliteDishRepository<'_> {
    fn create_dish(&self, dish: &Dish) -> RepoResult<DishId> {
        dish.validate()?;
        let price_cents = price_to_cents(dish.price)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_references_exist(&tx, dish)?;
        tx.execute(
            "INSERT INTO dishes (id, name, description, price_cents, dish_type_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                dish.id.to_string(),
                dish.name.as_str(),
                dish.description.as_str(),
                price_cents,
                dish.dish_type_id.to_string(),
            ],
        )?;
        replace_dish_cooks(&tx, dish.id, &dish.cook_ids)?;
        tx.commit()?;

        Ok(dish.id)
    }

    fn update_dish(&self, dish: &Dish) -> RepoResult<()> {
        dish.validate()?;
        let price_cents = price_to_cents(dish.price)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !row_exists(&tx, "dishes", &dish.id.to_string())? {
            return Err(RepoError::not_found(EntityKind::Dish, dish.id));
        }
        ensure_references_exist(&tx, dish)?;

        tx.execute(
            "UPDATE dishes
             SET
                name = ?1,
                description = ?2,
                price_cents = ?3,
                dish_type_id = ?4
             WHERE id = ?5;",
            params![
                dish.name.as_str(),
                dish.description.as_str(),
                price_cents,
                dish.dish_type_id.to_string(),
                dish.id.to_string(),
            ],
        )?;
        replace_dish_cooks(&tx, dish.id, &dish.cook_ids)?;
        tx.commit()?;

        Ok(())
    }

    fn get_dish(&self, id: DishId) -> RepoResult<Option<DishRecord>> {
        let rows = query_dish_rows(
            self.conn,
            &format!("{DISH_SELECT_SQL} WHERE d.id = ?"),
            vec![Value::Text(id.to_string())],
        )?;
        Ok(attach_cooks(self.conn, rows)?.into_iter().next())
    }

    fn delete_dish(&self, id: DishId) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        tx.execute(
            "DELETE FROM dish_cooks WHERE dish_id = ?1;",
            [id_text.as_str()],
        )?;
        let changed = tx.execute("DELETE FROM dishes WHERE id = ?1;", [id_text.as_str()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Dish, id));
        }

        tx.commit()?;
        Ok(())
    }

    fn page_dishes(
        &self,
        filter: Option<&str>,
        request: PageRequest,
    ) -> RepoResult<Page<DishRecord>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;

        let mut count_sql = String::from("SELECT COUNT(*) FROM dishes d");
        let mut count_binds: Vec<Value> = Vec::new();
        push_name_filter(&mut count_sql, &mut count_binds, &["d.name"], filter);
        let total: i64 = tx.query_row(&count_sql, params_from_iter(count_binds), |row| {
            row.get(0)
        })?;

        let mut sql = String::from(DISH_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();
        push_name_filter(&mut sql, &mut bind_values, &["d.name"], filter);
        sql.push_str(DISH_ORDER);
        sql.push_str(" LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(request.limit()));
        bind_values.push(Value::Integer(request.offset()));

        let rows = query_dish_rows(&tx, &sql, bind_values)?;
        let items = attach_cooks(&tx, rows)?;
        tx.commit()?;

        Ok(Page::new(items, request, count_to_u64(total, "dish")?))
    }

    fn list_dishes_by_type(&self, dish_type_id: DishTypeId) -> RepoResult<Vec<DishRecord>> {
        let rows = query_dish_rows(
            self.conn,
            &format!("{DISH_SELECT_SQL} WHERE d.dish_type_id = ?{DISH_ORDER}"),
            vec![Value::Text(dish_type_id.to_string())],
        )?;
        attach_cooks(self.conn, rows)
    }

    fn list_dishes_by_cook(&self, cook_id: CookId) -> RepoResult<Vec<DishRecord>> {
        let rows = query_dish_rows(
            self.conn,
            &format!(
                "{DISH_SELECT_SQL}
                 WHERE d.id IN (SELECT dish_id FROM dish_cooks WHERE cook_id = ?){DISH_ORDER}"
            ),
            vec![Value::Text(cook_id.to_string())],
        )?;
        attach_cooks(self.conn, rows)
    }

    fn count_dishes(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dishes;", [], |row| row.get(0))?;
        count_to_u64(total, "dish")
    }
}

fn ensure_references_exist(conn: &Connection, dish: &Dish) -> RepoResult<()> {
    if !row_exists(conn, "dish_types", &dish.dish_type_id.to_string())? {
        return Err(ValidationError::UnknownReference {
            field: "dish_type",
            id: dish.dish_type_id,
        }
        .into());
    }

    for cook_id in &dish.cook_ids {
        if !row_exists(conn, "cooks", &cook_id.to_string())? {
            return Err(ValidationError::UnknownReference {
                field: "cooks",
                id: *cook_id,
            }
            .into());
        }
    }

    Ok(())
}

fn replace_dish_cooks(
    conn: &Connection,
    dish_id: DishId,
    cook_ids: &BTreeSet<CookId>,
) -> RepoResult<()> {
    let dish_id_text = dish_id.to_string();
    conn.execute(
        "DELETE FROM dish_cooks WHERE dish_id = ?1;",
        [dish_id_text.as_str()],
    )?;
    for cook_id in cook_ids {
        conn.execute(
            "INSERT INTO dish_cooks (dish_id, cook_id) VALUES (?1, ?2);",
            params![dish_id_text.as_str(), cook_id.to_string()],
        )?;
    }
    Ok(())
}

fn query_dish_rows(
    conn: &Connection,
    sql: &str,
    bind_values: Vec<Value>,
) -> RepoResult<Vec<(Dish, DishType)>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut dishes = Vec::new();
    while let Some(row) = rows.next()? {
        dishes.push(parse_dish_row(row)?);
    }
    Ok(dishes)
}

fn parse_dish_row(row: &Row<'_>) -> RepoResult<(Dish, DishType)> {
    let id_text: String = row.get("id")?;
    let dish_type_text: String = row.get("dish_type_id")?;

    let dish_type = DishType {
        id: parse_uuid(&dish_type_text, "dishes.dish_type_id")?,
        name: row.get("dish_type_name")?,
    };
    let dish = Dish {
        id: parse_uuid(&id_text, "dishes.id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        price: price_from_cents(row.get("price_cents")?),
        dish_type_id: dish_type.id,
        cook_ids: BTreeSet::new(),
    };
    dish.validate()?;
    dish_type.validate()?;
    Ok((dish, dish_type))
}

fn attach_cooks(conn: &Connection, rows: Vec<(Dish, DishType)>) -> RepoResult<Vec<DishRecord>> {
    let ids = rows.iter().map(|(dish, _)| dish.id).collect::<Vec<_>>();
    let mut cooks_by_dish = load_cooks_for_dishes(conn, &ids)?;

    Ok(rows
        .into_iter()
        .map(|(mut dish, dish_type)| {
            let cooks = cooks_by_dish.remove(&dish.id).unwrap_or_default();
            dish.cook_ids = cooks.iter().map(|cook| cook.id).collect();
            DishRecord {
                dish,
                dish_type,
                cooks,
            }
        })
        .collect())
}

fn load_cooks_for_dishes(
    conn: &Connection,
    dish_ids: &[DishId],
) -> RepoResult<HashMap<DishId, Vec<Cook>>> {
    let mut cooks_by_dish: HashMap<DishId, Vec<Cook>> = HashMap::new();

    for chunk in dish_ids.chunks(MAX_IDS_PER_QUERY) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "SELECT dc.dish_id AS dish_id, {COOK_COLUMNS}
             FROM dish_cooks dc
             INNER JOIN cooks c ON c.id = dc.cook_id
             WHERE dc.dish_id IN ({placeholders})
             ORDER BY {COOK_ORDER};"
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(chunk.iter().map(|id| id.to_string())))?;
        while let Some(row) = rows.next()? {
            let dish_id_text: String = row.get("dish_id")?;
            let dish_id = parse_uuid(&dish_id_text, "dish_cooks.dish_id")?;
            cooks_by_dish
                .entry(dish_id)
                .or_default()
                .push(parse_cook_columns(row)?);
        }
    }

    Ok(cooks_by_dish)
}
