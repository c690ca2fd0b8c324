//! Small SQL helpers shared by the SQLite repositories.

use super::{RepoError, RepoResult};
use crate::db::ICONTAINS_FUNCTION;
use crate::model::cook::Cook;
use rusqlite::ffi;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use uuid::Uuid;

pub(crate) const COOK_COLUMNS: &str = "c.id AS cook_id,
    c.username AS cook_username,
    c.first_name AS cook_first_name,
    c.last_name AS cook_last_name,
    c.years_of_experience AS cook_years_of_experience";

/// Cook ordering used everywhere cooks are listed.
pub(crate) const COOK_ORDER: &str = "c.years_of_experience ASC, c.username ASC";

/// Appends a case-insensitive substring filter over `columns` (OR-ed).
///
/// `None` leaves the SQL untouched so the full set is returned.
pub(crate) fn push_name_filter(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    columns: &[&str],
    filter: Option<&str>,
) {
    let Some(filter) = filter else {
        return;
    };

    let clauses = columns
        .iter()
        .map(|column| format!("{ICONTAINS_FUNCTION}({column}, ?)"))
        .collect::<Vec<_>>();
    sql.push_str(" WHERE (");
    sql.push_str(&clauses.join(" OR "));
    sql.push(')');
    for _ in columns {
        bind_values.push(Value::Text(filter.to_string()));
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

/// Reads a cook from columns selected with [`COOK_COLUMNS`].
pub(crate) fn parse_cook_columns(row: &Row<'_>) -> RepoResult<Cook> {
    let id_text: String = row.get("cook_id")?;
    let cook = Cook {
        id: parse_uuid(&id_text, "cooks.id")?,
        username: row.get("cook_username")?,
        first_name: row.get("cook_first_name")?,
        last_name: row.get("cook_last_name")?,
        years_of_experience: row.get("cook_years_of_experience")?,
    };
    cook.validate()?;
    Ok(cook)
}

/// True when `table` holds a row with primary key `id`.
pub(crate) fn row_exists(conn: &Connection, table: &'static str, id: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn count_to_u64(count: i64, what: &str) -> RepoResult<u64> {
    u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative {what} count")))
}

/// True for UNIQUE / PRIMARY KEY constraint failures.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
