//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by the store contract.
//! - Run the schema initializer once per process start.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - `open_db*` connections have every record type present; `connect` skips
//!   schema creation and relies on `initialize_schema` having run at startup.

use super::schema::create_schema;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Ensures the store at `path` holds every record type, creating it if needed.
///
/// Safe to call on every process start. The connection used for creation is
/// closed before returning.
///
/// # Errors
/// - Returns the open or schema creation failure. Callers decide whether that is
///   fatal; the bundled CLI treats it as a startup failure.
pub fn initialize_schema(path: impl AsRef<Path>) -> DbResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=schema_init module=db status=start path={}",
        path.display()
    );

    match open_db(path) {
        Ok(conn) => {
            drop(conn);
            info!(
                "event=schema_init module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_init module=db status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a SQLite database file and ensures every record type exists.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_and_bootstrap("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database and ensures every record type exists.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_and_bootstrap("memory", Connection::open_in_memory)
}

/// Opens a scoped per-operation connection without touching the schema.
///
/// The connection is released when the returned value is dropped, which
/// happens on every exit path of the caller.
pub fn connect(path: impl AsRef<Path>) -> DbResult<Connection> {
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

fn open_and_bootstrap(
    mode: &str,
    opener: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match opener() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    let bootstrapped = configure_connection(&conn).and_then(|()| create_schema(&mut conn));
    match bootstrapped {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    // Must precede any DDL or the Cars_Id references stay inert.
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
