//! Ordered kitchen schema steps, tracked in `PRAGMA user_version`.
//!
//! Steps are append-only: a released step is never edited, a schema change
//! ships as a new step with the next version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "dish_types_dishes_cooks",
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "dish_cooks_indexes",
        sql: include_str!("0002_relation_indexes.sql"),
    },
];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings the schema up to [`latest_version`] in one IMMEDIATE transaction.
///
/// The stored version is re-read after the write lock is taken, so a
/// concurrent opener that already migrated turns this into a no-op.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let supported = latest_version();
    let found = stored_version(conn)?;
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }
    if found == supported {
        return Ok(());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let from = stored_version(&tx)?;
    for step in STEPS.iter().filter(|step| step.version > from) {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from, supported
    );
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    let to_migration_error = |source| DbError::Migration {
        version: step.version,
        source,
    };
    tx.execute_batch(step.sql).map_err(to_migration_error)?;
    tx.pragma_update(None, "user_version", step.version)
        .map_err(to_migration_error)?;
    debug!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        step.version, step.name
    );
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
