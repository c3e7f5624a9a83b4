//! Ledger database initialization and schema migration.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{info, warn};

const LEDGER_ORDER_INDEX: &str = "idx_transactions_ledger_order";

/// Open (creating if needed) the ledger database and bring its schema up to date.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { configure_connection(conn).await }))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    run_migrations(&pool).await?;

    info!(path = %db_path, "Ledger database initialized");
    Ok(pool)
}

/// Apply `schema.sql`. Every statement is `IF NOT EXISTS`, so reruns are no-ops.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements: Vec<&str> = include_str!("schema.sql")
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    for statement in &statements {
        sqlx::query(statement).execute(pool).await?;
    }

    if !has_ledger_order_index(pool).await? {
        // Reads still work, they just sort the whole table.
        warn!(index = LEDGER_ORDER_INDEX, "Ledger order index missing after migration");
    }

    info!(statements = statements.len(), "Ledger schema up to date");
    Ok(())
}

/// Whether the `(subaccount_id, started_at, id)` index backing ledger reads exists.
async fn has_ledger_order_index(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?")
        .bind(LEDGER_ORDER_INDEX)
        .fetch_one(pool)
        .await?;
    let count: i64 = row.get(0);
    Ok(count > 0)
}

/// Correction batches from concurrent groups wait on the busy timeout instead of failing.
async fn configure_connection(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    if !journal_mode.eq_ignore_ascii_case("wal") {
        warn!(
            journal_mode = %journal_mode,
            "WAL unavailable, readers will block during correction batches"
        );
    }

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}
