//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Initialize the database file once per process (`init_db`).
//! - Open request-scoped connections (`open_db`) and test databases.
//!
//! # Invariants
//! - Returned connections carry a busy timeout so concurrent writers wait
//!   on the file lock instead of failing fast.
//! - Only `init_db` and `open_db_in_memory` may create the schema.

use super::schema::{create_todos_table, table_exists, TODOS_TABLE};
use super::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of startup schema initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The `todos` table was missing and has been created.
    Created,
    /// The `todos` table already existed and was left untouched.
    Existing,
}

/// Ensures the database file at `path` holds a `todos` table.
///
/// Runs once at process startup, never per request.
///
/// # Side effects
/// - Creates the database file when absent.
/// - Emits `db_init` logging events with duration and outcome.
pub fn init_db(path: impl AsRef<Path>) -> DbResult<InitOutcome> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=db_init module=db status=start path={}",
        path.display()
    );

    let result = Connection::open(path)
        .map_err(DbError::from)
        .and_then(|conn| ensure_schema(&conn));

    match result {
        Ok(outcome) => {
            info!(
                "event=db_init module=db status=ok outcome={} duration_ms={} path={}",
                outcome_label(outcome),
                started_at.elapsed().as_millis(),
                path.display()
            );
            Ok(outcome)
        }
        Err(err) => {
            error!(
                "event=db_init module=db status=error duration_ms={} error_code=db_init_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a request-scoped connection to an initialized database file.
///
/// The connection is released when dropped; callers hold it for exactly
/// one request.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };
    conn.busy_timeout(BUSY_TIMEOUT)?;

    debug!(
        "event=db_open module=db status=ok mode=file duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Opens a private in-memory database with the schema applied.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();

    let conn = Connection::open_in_memory()?;
    if let Err(err) = ensure_schema(&conn) {
        error!(
            "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_bootstrap_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err);
    }

    debug!(
        "event=db_open module=db status=ok mode=memory duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn ensure_schema(conn: &Connection) -> DbResult<InitOutcome> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if table_exists(conn, TODOS_TABLE)? {
        return Ok(InitOutcome::Existing);
    }
    create_todos_table(conn)?;
    Ok(InitOutcome::Created)
}

fn outcome_label(outcome: InitOutcome) -> &'static str {
    match outcome {
        InitOutcome::Created => "created",
        InitOutcome::Existing => "existing",
    }
}
