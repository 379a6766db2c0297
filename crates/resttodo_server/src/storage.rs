//! Request-scoped storage access.
//!
//! Each call opens one SQLite connection on the blocking pool, hands a
//! `TodoService` to the caller, and drops the connection when the closure
//! returns, on success and error paths alike.

use crate::error::ApiError;
use resttodo_core::db::{init_db, open_db, DbResult, InitOutcome};
use resttodo_core::{RepoResult, SqliteTodoRepository, TodoService};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle to the todo database file. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Storage {
    db_path: Arc<PathBuf>,
}

impl Storage {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }

    pub fn db_path(&self) -> &Path {
        self.db_path.as_path()
    }

    /// Creates the schema if missing. Called once at startup.
    pub fn init(&self) -> DbResult<InitOutcome> {
        init_db(self.db_path())
    }

    /// Runs `op` against a service bound to a fresh connection.
    pub async fn with_service<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&TodoService<SqliteTodoRepository<'_>>) -> RepoResult<T> + Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        let joined = tokio::task::spawn_blocking(move || -> RepoResult<T> {
            let conn = open_db(db_path.as_path())?;
            let service = TodoService::new(SqliteTodoRepository::try_new(&conn)?);
            op(&service)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(ApiError::from),
            Err(err) => Err(ApiError::Internal(format!("storage task failed: {err}"))),
        }
    }
}
