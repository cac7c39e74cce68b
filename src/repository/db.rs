//! Database Connection and Setup
//!
//! Manages the SQLite database connection and migrations.

use std::path::Path;

use libsql::{Builder, Connection};

use crate::domain::{DomainError, DomainResult};

/// Open (or create) the database at `db_path` and run migrations.
///
/// Use `:memory:` as the path for an in-memory database in tests.
pub async fn init_db(db_path: &Path) -> DomainResult<Connection> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| DomainError::StoreRead("invalid database path".to_string()))?;

    let db = Builder::new_local(db_path_str)
        .build()
        .await
        .map_err(|e| DomainError::StoreRead(format!("failed to open db: {}", e)))?;

    let conn = db
        .connect()
        .map_err(|e| DomainError::StoreRead(format!("failed to connect: {}", e)))?;

    run_migrations(&conn).await?;

    Ok(conn)
}

/// Run database migrations
async fn run_migrations(conn: &Connection) -> DomainResult<()> {
    // Tasks table. Timestamps are unix milliseconds; title/entry/date_created
    // are nullable to match records imported from older installs.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY,
            title TEXT,
            entry TEXT,
            completed INTEGER NOT NULL DEFAULT 0,
            date_created INTEGER
        )",
        (),
    )
    .await
    .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

    // Every listing sorts by creation time
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tasks_date_created ON tasks(date_created)",
        (),
    )
    .await
    .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

    // Key/value settings, e.g. the one-time launch flag
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )
    .await
    .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

    Ok(())
}
