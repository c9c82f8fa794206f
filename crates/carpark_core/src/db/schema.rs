//! Schema initializer for the car park store.
//!
//! # Responsibility
//! - Create the `Car`, `CarPark` and `Cars_Id` record types.
//! - Confirm every required record type exists afterwards.
//!
//! # Invariants
//! - The DDL batch runs on every call; all statements are `IF NOT EXISTS`,
//!   so existing tables and rows are left untouched.
//! - `PRAGMA user_version` is neither read nor written; a value set by
//!   another tool never blocks initialization.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Record types every initialized store must contain.
pub const REQUIRED_TABLES: &[&str] = &["Car", "CarPark", "Cars_Id"];

/// Creates any missing record type, then checks all of them are present.
///
/// Callers must enable `foreign_keys` first so the declared references on
/// `Cars_Id` are enforced from the first write.
pub fn create_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.commit()?;

    match missing_table(conn)? {
        Some(table) => Err(DbError::MissingTable(table)),
        None => Ok(()),
    }
}

fn missing_table(conn: &Connection) -> DbResult<Option<&'static str>> {
    let mut stmt = conn.prepare(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
    )?;
    for &table in REQUIRED_TABLES {
        let exists: bool = stmt.query_row([table], |row| row.get(0))?;
        if !exists {
            return Ok(Some(table));
        }
    }
    Ok(None)
}
