//! Ordered schema steps for the progress database.
//!
//! Each step runs in its own transaction together with the
//! `PRAGMA user_version` bump, so a failed step leaves the previous version
//! intact.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

/// `(version, sql)`; versions strictly increase.
const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_store.sql"))];

/// Returns the schema version this build writes.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `DbError::Migration` naming the first step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::UnsupportedSchemaVersion { found, supported });
    }

    let pending = STEPS.iter().filter(|(version, _)| *version > found);
    for &(version, sql) in pending {
        run_step(conn, version, sql).map_err(|source| {
            error!("event=db_migrate module=db status=error version={version} error={source}");
            DbError::Migration { version, source }
        })?;
        info!("event=db_migrate module=db status=ok version={version}");
    }
    Ok(())
}

fn run_step(conn: &mut Connection, version: u32, sql: &str) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
