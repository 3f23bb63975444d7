use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        name           TEXT    NOT NULL,
        remaining_days INTEGER NOT NULL CHECK (remaining_days >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vacations (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id  INTEGER NOT NULL REFERENCES employees (id) ON DELETE CASCADE,
        start_date   TEXT    NOT NULL,
        end_date     TEXT    NOT NULL,
        total_days   INTEGER NOT NULL CHECK (total_days >= 0),
        status       TEXT    NOT NULL DEFAULT 'Pending',
        submitted_at TEXT    NOT NULL,
        CHECK (start_date <= end_date)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_vacations_employee_status ON vacations (employee_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_vacations_status_submitted ON vacations (status, submitted_at)",
];

pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Creates the tables if they are missing; safe to run on every start.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("Schema ready");
    Ok(())
}

/// Opens a transaction that holds the write lock from its first statement.
///
/// Every mutation reads before it writes. Under a deferred `BEGIN` the
/// read-to-write upgrade fails with `SQLITE_BUSY` instead of waiting on
/// `busy_timeout`, so writers must queue at `BEGIN IMMEDIATE`.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Fresh in-memory database with the schema applied.
///
/// A single connection that never idles out, otherwise every new connection
/// would see its own empty database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}

/// WAL database in a temporary directory, opened the way `main` opens it.
///
/// Keep the directory alive for as long as the pool is used.
#[cfg(test)]
pub async fn file_test_pool() -> (SqlitePool, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("vacation.db").display());
    let pool = init_db(&url).await.unwrap();
    (pool, dir)
}
