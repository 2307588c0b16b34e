//! SQLite backing for the board's named string slots.
//!
//! The whole schema is a single `kv_slots` table (`key`, `value`,
//! `updated_at` in epoch millis). The board keeps its entire task list as
//! one JSON string under one key, so there is no per-task table to migrate.
//!
//! Connections handed out by `open_db*` are already at `latest_version()`;
//! `SqliteSlotRepository::try_new` refuses anything else with
//! `DbError::SchemaNotReady`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening, migrating or querying the slot database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a newer build with more migrations.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// Connection has not been migrated up to the slot schema.
    SchemaNotReady { db_version: u32, expected: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot database is at schema {db_version}, this build only knows up to {latest_supported}"
            ),
            Self::SchemaNotReady {
                db_version,
                expected,
            } => write!(
                f,
                "slot database is at schema {db_version}, expected {expected}; open it through open_db"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
