//! Connection sources for scoped per-operation access.

use super::{connect, DbResult};
use rusqlite::Connection;
use std::path::PathBuf;

/// Hands out one fresh connection per storage attempt.
///
/// Implementations must not cache connections across calls; the caller
/// drops the connection when its attempt finishes.
pub trait ConnectionSource {
    fn connect(&self) -> DbResult<Connection>;
}

/// Store backed by a SQLite file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteFileStore {
    path: PathBuf,
}

impl SqliteFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConnectionSource for SqliteFileStore {
    fn connect(&self) -> DbResult<Connection> {
        connect(&self.path)
    }
}
