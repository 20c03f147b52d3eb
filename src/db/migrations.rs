//! Database migrations
//!
//! Schema versions are tracked in a `schema_migrations` table; each batch
//! is applied at most once, inside a transaction.

use crate::core::error::{LedgerError, Result};
use rusqlite::Connection;
use tracing::info;

/// Migration version tracking table
const MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Initial schema migration (version 1)
const MIGRATION_V1: &str = r#"
-- Users table (authentication)
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Budgets table (one row per user and category)
CREATE TABLE IF NOT EXISTS budgets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    category TEXT NOT NULL,
    limit_amount REAL NOT NULL,
    spent REAL NOT NULL DEFAULT 0,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
    UNIQUE(user_id, category)
);

-- Transactions table (append-only ledger entries)
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT,
    type TEXT NOT NULL DEFAULT 'expense',
    amount REAL NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_transactions_user_date
    ON transactions(user_id, date DESC);
"#;

/// All migration batches in order, paired with their version number
const MIGRATIONS: &[(i64, &str)] = &[(1, MIGRATION_V1)];

/// Run all pending migrations against the given connection
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(MIGRATION_TABLE)
        .map_err(LedgerError::StoreError)?;

    let current = current_version(conn)?;

    for (version, batch) in MIGRATIONS {
        if *version <= current {
            continue;
        }

        info!(version, "Applying database migration");

        let tx = conn.transaction().map_err(LedgerError::StoreError)?;
        tx.execute_batch(batch).map_err(LedgerError::StoreError)?;
        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?)",
            [version],
        )
        .map_err(LedgerError::StoreError)?;
        tx.commit().map_err(LedgerError::StoreError)?;

        info!(version, "Migration applied");
    }

    Ok(())
}

/// Highest applied migration version, or 0 for a fresh database
fn current_version(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(LedgerError::StoreError)
}
