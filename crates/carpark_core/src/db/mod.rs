//! SQLite storage bootstrap and schema initialization entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the car park store.
//! - Create the `Car`, `CarPark` and `Cars_Id` record types idempotently.
//!
//! # Invariants
//! - Every connection handed out has `foreign_keys=ON`.
//! - Schema creation is idempotent DDL followed by a required-table check.
//! - Command handlers must not touch the store before `initialize_schema` succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;
mod store;

pub use open::{connect, initialize_schema, open_db, open_db_in_memory};
pub use store::{ConnectionSource, SqliteFileStore};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A required record type is still absent after schema creation.
    MissingTable(&'static str),
}

impl DbError {
    /// Returns whether the failure is lock contention that may clear on its own.
    ///
    /// Only `SQLITE_BUSY` and `SQLITE_LOCKED` qualify; everything else
    /// (I/O faults, constraint violations, missing tables) is treated as
    /// persistent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Sqlite(err) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
            ),
            Self::MissingTable(_) => false,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::MissingTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
