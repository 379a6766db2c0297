//! Todo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `todos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every write is a single parameterized statement.
//! - Partial updates list only the present fields plus `updated_at`.
//! - `updated_at` never moves backwards.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::schema::{table_columns, TODOS_COLUMNS, TODOS_TABLE};
use crate::db::DbError;
use crate::model::timestamp;
use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    done,
    created_at,
    updated_at
FROM todos";

const LIKE_ESCAPE: char = '\\';

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(TodoId),
    /// Persisted data cannot be converted to a valid `Todo`.
    InvalidData(String),
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "todo repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "todo repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter options for listing todos. Absent filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    /// Completion state filter.
    pub done: Option<bool>,
    /// Substring matched against title or description. Blank is ignored.
    pub search: Option<String>,
}

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    /// Inserts a todo stamped with `now` and returns the stored record.
    fn create_todo(&self, input: &NewTodo, now: &str) -> RepoResult<Todo>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Lists matching todos, most recently created first.
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>>;
    /// Applies present patch fields, refreshes `updated_at`, returns the result.
    fn update_todo(&self, id: TodoId, patch: &TodoPatch, now: &str) -> RepoResult<Todo>;
    /// Permanently removes a todo.
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed todo repository borrowing one connection.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from an initialized connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   was never created or does not match.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_todo_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn fetch_existing(&self, id: TodoId) -> RepoResult<Todo> {
        self.get_todo(id)?.ok_or(RepoError::NotFound(id))
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, input: &NewTodo, now: &str) -> RepoResult<Todo> {
        self.conn.execute(
            "INSERT INTO todos (
                title,
                description,
                done,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?4);",
            params![
                input.title(),
                input.description(),
                bool_to_int(input.done()),
                now,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.fetch_existing(id)
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>> {
        let mut sql = format!("{TODO_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(done) = query.done {
            sql.push_str(" AND done = ?");
            bind_values.push(Value::Integer(bool_to_int(done)));
        }

        if let Some(search) = query.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                let pattern = format!("%{}%", escape_like(search));
                sql.push_str(" AND (title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')");
                bind_values.push(Value::Text(pattern.clone()));
                bind_values.push(Value::Text(pattern));
            }
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn update_todo(&self, id: TodoId, patch: &TodoPatch, now: &str) -> RepoResult<Todo> {
        let mut assignments: Vec<&str> = Vec::with_capacity(4);
        let mut bind_values: Vec<Value> = Vec::with_capacity(5);

        if let Some(title) = patch.title() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.to_string()));
        }
        if let Some(description) = patch.description() {
            assignments.push("description = ?");
            bind_values.push(Value::Text(description.to_string()));
        }
        if let Some(done) = patch.done() {
            assignments.push("done = ?");
            bind_values.push(Value::Integer(bool_to_int(done)));
        }

        // Scalar MAX keeps `updated_at` monotonic if the wall clock steps back.
        assignments.push("updated_at = MAX(updated_at, ?)");
        bind_values.push(Value::Text(now.to_string()));
        bind_values.push(Value::Integer(id));

        let sql = format!("UPDATE todos SET {} WHERE id = ?;", assignments.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.fetch_existing(id)
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn ensure_todo_connection_ready(conn: &Connection) -> RepoResult<()> {
    let columns = table_columns(conn, TODOS_TABLE)?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(TODOS_TABLE));
    }

    if let Some(column) = TODOS_COLUMNS
        .into_iter()
        .find(|required| !columns.iter().any(|existing| existing == required))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: TODOS_TABLE,
            column,
        });
    }

    Ok(())
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let id: TodoId = row.get("id")?;

    let title: String = row.get("title")?;
    if title.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty title in todos.title for id {id}"
        )));
    }

    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other}` in todos.done for id {id}"
            )));
        }
    };

    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    for (column, value) in [("created_at", &created_at), ("updated_at", &updated_at)] {
        if !timestamp::is_valid(value) {
            return Err(RepoError::InvalidData(format!(
                "invalid timestamp `{value}` in todos.{column} for id {id}"
            )));
        }
    }

    Ok(Todo {
        id,
        title,
        description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
        done,
        created_at,
        updated_at,
    })
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == LIKE_ESCAPE || ch == '%' || ch == '_' {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
