//! Todo table definition and presence checks.

use rusqlite::Connection;

/// Name of the only application table.
pub const TODOS_TABLE: &str = "todos";

/// Columns every reader and writer relies on.
pub const TODOS_COLUMNS: [&str; 6] = [
    "id",
    "title",
    "description",
    "done",
    "created_at",
    "updated_at",
];

const CREATE_TODOS_SQL: &str = "CREATE TABLE todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    done INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

/// Creates the `todos` table. Callers must check `table_exists` first.
pub fn create_todos_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_TODOS_SQL)
}

/// Returns whether `table` exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns the column names declared by `table`; empty when it does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(1)?);
    }
    Ok(columns)
}
