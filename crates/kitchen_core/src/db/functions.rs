//! Scalar SQL functions registered on every kitchen connection.
//!
//! SQLite's built-in `LIKE`/`lower()` only fold ASCII, so substring search
//! is delegated to Rust's Unicode-aware lowercase.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// `kitchen_icontains(haystack, needle)` returns 1 when `needle` is a
/// case-insensitive substring of `haystack`. NULL on either side yields 0.
pub const ICONTAINS_FUNCTION: &str = "kitchen_icontains";

pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        ICONTAINS_FUNCTION,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<Option<String>>(0)?;
            let needle = ctx.get::<Option<String>>(1)?;
            Ok(match (haystack, needle) {
                (Some(haystack), Some(needle)) => icontains(&haystack, &needle),
                _ => false,
            })
        },
    )
}

/// Case-insensitive substring check; an empty needle matches everything.
pub(crate) fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{icontains, register_functions, ICONTAINS_FUNCTION};
    use rusqlite::Connection;

    #[test]
    fn icontains_folds_unicode_case() {
        assert!(icontains("Beef Wellington", "WELLING"));
        assert!(icontains("Crème Brûlée", "BRÛLÉE"));
        assert!(icontains("anything", ""));
        assert!(!icontains("Pasta", "pizza"));
    }

    #[test]
    fn registered_function_is_callable_from_sql() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        let matched: bool = conn
            .query_row(
                &format!("SELECT {ICONTAINS_FUNCTION}('Ramsay', 'RAM');"),
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(matched);

        let null_matched: bool = conn
            .query_row(
                &format!("SELECT {ICONTAINS_FUNCTION}(NULL, 'x');"),
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!null_matched);
    }
}
