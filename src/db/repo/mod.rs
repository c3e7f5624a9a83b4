//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules:
//! - `transactions.rs` - Transaction seeding, lookup and the bulk ledger read
//! - `store.rs` - `TransactionStore` implementation used by the recalculator

mod store;
mod transactions;

use sqlx::sqlite::SqlitePool;
use tokio::sync::Mutex;

/// Repository for database operations.
#[derive(Debug)]
pub struct Repository {
    pool: SqlitePool,
    // SQLite has a single writer; correction batches take turns.
    write_lock: Mutex<()>,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
