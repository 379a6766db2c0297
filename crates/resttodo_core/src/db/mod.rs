//! SQLite storage bootstrap.
//!
//! # Responsibility
//! - Create the `todos` table once at process startup.
//! - Open per-request connections against an initialized database file.
//!
//! # Invariants
//! - Schema creation is check-then-create; an existing table is never altered.
//! - Request-scoped connections never create or modify schema.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{init_db, open_db, open_db_in_memory, InitOutcome};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
