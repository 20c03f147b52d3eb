//! Repository pattern implementation for data access layer
//!
//! Each entity gets a repository over the shared [`DatabaseManager`];
//! queries run on the blocking pool and are always scoped to a user where
//! the entity is user-owned.

use crate::core::error::{LedgerError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::{Budget, CategorySpend, Transaction, User};
use rusqlite::OptionalExtension;
use std::sync::Arc;

/// Map an insert failure to DuplicateEmail when the UNIQUE constraint on
/// users.email fired, and to StoreError otherwise.
fn map_unique_violation(e: rusqlite::Error) -> LedgerError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            LedgerError::DuplicateEmail
        }
        _ => LedgerError::StoreError(e),
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Repository for User entities (the credential store)
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find a user by email (exact match)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT id, username, email, password, created_at FROM users WHERE email = ?",
                    [&email],
                    row_to_user,
                )
                .optional()
                .map_err(LedgerError::StoreError)
            })
            .await
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT id, username, email, password, created_at FROM users WHERE id = ?",
                    [id],
                    row_to_user,
                )
                .optional()
                .map_err(LedgerError::StoreError)
            })
            .await
    }

    /// Insert a new user and return the assigned id
    ///
    /// The UNIQUE constraint on email makes the insert atomic under
    /// concurrent registration; a constraint violation surfaces as
    /// DuplicateEmail.
    pub async fn create(&self, email: &str, username: &str, password_hash: &str) -> Result<i64> {
        let email = email.to_string();
        let username = username.to_string();
        let password_hash = password_hash.to_string();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (username, email, password) VALUES (?, ?, ?)",
                    [&username, &email, &password_hash],
                )
                .map_err(map_unique_violation)?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute(|conn| {
                conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                    .map_err(LedgerError::StoreError)
            })
            .await
    }
}

fn row_to_budget(row: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        limit_amount: row.get(3)?,
        spent: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Repository for Budget entities
pub struct BudgetRepository {
    db: Arc<DatabaseManager>,
}

impl BudgetRepository {
    /// Create a new BudgetRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// All budgets for a user, ordered by category
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Budget>> {
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, user_id, category, limit_amount, spent, created_at \
                         FROM budgets WHERE user_id = ? ORDER BY category",
                    )
                    .map_err(LedgerError::StoreError)?;

                let budgets = stmt
                    .query_map([user_id], row_to_budget)
                    .map_err(LedgerError::StoreError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(LedgerError::StoreError)?;

                Ok(budgets)
            })
            .await
    }

    /// Insert a budget for a category, or update its limit if one exists
    pub async fn upsert(&self, user_id: i64, category: &str, limit_amount: f64) -> Result<()> {
        let category = category.to_string();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO budgets (user_id, category, limit_amount) VALUES (?, ?, ?) \
                     ON CONFLICT(user_id, category) \
                     DO UPDATE SET limit_amount = excluded.limit_amount",
                    rusqlite::params![user_id, &category, limit_amount],
                )
                .map_err(LedgerError::StoreError)?;
                Ok(())
            })
            .await
    }

    /// Delete a budget by category; returns whether a row was removed
    pub async fn delete_by_category(&self, user_id: i64, category: &str) -> Result<bool> {
        let category = category.to_string();
        self.db
            .execute(move |conn| {
                let affected = conn
                    .execute(
                        "DELETE FROM budgets WHERE user_id = ? AND category = ?",
                        rusqlite::params![user_id, &category],
                    )
                    .map_err(LedgerError::StoreError)?;
                Ok(affected > 0)
            })
            .await
    }

    /// Budgets whose spending exceeds their limit
    pub async fn find_over_limit(&self, user_id: i64) -> Result<Vec<Budget>> {
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, user_id, category, limit_amount, spent, created_at \
                         FROM budgets WHERE user_id = ? AND spent > limit_amount \
                         ORDER BY category",
                    )
                    .map_err(LedgerError::StoreError)?;

                let budgets = stmt
                    .query_map([user_id], row_to_budget)
                    .map_err(LedgerError::StoreError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(LedgerError::StoreError)?;

                Ok(budgets)
            })
            .await
    }
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        tx_type: row.get(5)?,
        amount: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Repository for Transaction entities
pub struct TransactionRepository {
    db: Arc<DatabaseManager>,
}

impl TransactionRepository {
    /// Create a new TransactionRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Transactions for a user, most recent first, optionally limited
    pub async fn find_by_user(&self, user_id: i64, limit: Option<u32>) -> Result<Vec<Transaction>> {
        self.db
            .execute(move |conn| {
                let mut sql = "SELECT id, user_id, date, description, category, type, amount, \
                               created_at FROM transactions WHERE user_id = ? \
                               ORDER BY date DESC, id DESC"
                    .to_string();
                if let Some(limit) = limit {
                    sql.push_str(&format!(" LIMIT {}", limit));
                }

                let mut stmt = conn.prepare(&sql).map_err(LedgerError::StoreError)?;

                let txs = stmt
                    .query_map([user_id], row_to_transaction)
                    .map_err(LedgerError::StoreError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(LedgerError::StoreError)?;

                Ok(txs)
            })
            .await
    }

    /// Insert a ledger entry and return the assigned id
    ///
    /// Expense entries with a category also bump the matching budget's
    /// running `spent` total, in the same transaction.
    pub async fn create(
        &self,
        user_id: i64,
        date: &str,
        description: &str,
        category: Option<&str>,
        tx_type: &str,
        amount: f64,
    ) -> Result<i64> {
        let date = date.to_string();
        let description = description.to_string();
        let category = category.map(|c| c.to_string());
        let tx_type = tx_type.to_string();

        self.db
            .transaction(move |tx| {
                tx.execute(
                    "INSERT INTO transactions (user_id, date, description, category, type, amount) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                    rusqlite::params![user_id, &date, &description, &category, &tx_type, amount],
                )
                .map_err(LedgerError::StoreError)?;
                let id = tx.last_insert_rowid();

                if tx_type == "expense" {
                    if let Some(category) = &category {
                        tx.execute(
                            "UPDATE budgets SET spent = spent + ? \
                             WHERE user_id = ? AND category = ?",
                            rusqlite::params![amount, user_id, category],
                        )
                        .map_err(LedgerError::StoreError)?;
                    }
                }

                Ok(id)
            })
            .await
    }

    /// Running balance: income minus expenses
    pub async fn balance(&self, user_id: i64) -> Result<f64> {
        self.db
            .execute(move |conn| {
                let balance: Option<f64> = conn
                    .query_row(
                        "SELECT SUM(CASE WHEN type = 'income' THEN amount ELSE -amount END) \
                         FROM transactions WHERE user_id = ?",
                        [user_id],
                        |row| row.get(0),
                    )
                    .map_err(LedgerError::StoreError)?;
                Ok(balance.unwrap_or(0.0))
            })
            .await
    }

    /// Expense totals grouped by category, largest first
    pub async fn spending_by_category(&self, user_id: i64) -> Result<Vec<CategorySpend>> {
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT category, SUM(amount) AS total FROM transactions \
                         WHERE user_id = ? AND type = 'expense' AND category IS NOT NULL \
                         GROUP BY category ORDER BY total DESC",
                    )
                    .map_err(LedgerError::StoreError)?;

                let report = stmt
                    .query_map([user_id], |row| {
                        Ok(CategorySpend {
                            category: row.get(0)?,
                            total: row.get(1)?,
                        })
                    })
                    .map_err(LedgerError::StoreError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(LedgerError::StoreError)?;

                Ok(report)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Arc<DatabaseManager> {
        Arc::new(DatabaseManager::new_in_memory().unwrap())
    }

    async fn seed_user(repo: &UserRepository) -> i64 {
        repo.create("a@x.com", "alice", "hash-a").await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let repo = UserRepository::new(test_db());

        let id = seed_user(&repo).await;
        assert!(id > 0);

        let user = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "hash-a");

        let missing = repo.find_by_email("b@x.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_email_lookup_is_exact_match() {
        let repo = UserRepository::new(test_db());
        seed_user(&repo).await;

        // Case-variant email is a different key
        let missing = repo.find_by_email("A@X.COM").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = UserRepository::new(test_db());
        seed_user(&repo).await;

        let dup = repo.create("a@x.com", "mallory", "hash-m").await;
        assert!(matches!(dup, Err(LedgerError::DuplicateEmail)));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration() {
        // On-disk database so both tasks share real connections
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db = Arc::new(
            DatabaseManager::new(
                &temp_dir.path().join("race.db"),
                4,
                std::time::Duration::from_secs(5),
            )
            .unwrap(),
        );
        let repo = Arc::new(UserRepository::new(db));

        let a = {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create("race@x.com", "first", "h1").await })
        };
        let b = {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create("race@x.com", "second", "h2").await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(LedgerError::DuplicateEmail)))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_budget_upsert_and_delete() {
        let db = test_db();
        let users = UserRepository::new(db.clone());
        let budgets = BudgetRepository::new(db);

        let uid = seed_user(&users).await;

        budgets.upsert(uid, "Food", 500.0).await.unwrap();
        budgets.upsert(uid, "Rent", 1200.0).await.unwrap();
        // Upsert on an existing category updates the limit in place
        budgets.upsert(uid, "Food", 600.0).await.unwrap();

        let all = budgets.find_by_user(uid).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].category, "Food");
        assert_eq!(all[0].limit_amount, 600.0);

        assert!(budgets.delete_by_category(uid, "Rent").await.unwrap());
        assert!(!budgets.delete_by_category(uid, "Rent").await.unwrap());
        assert_eq!(budgets.find_by_user(uid).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transactions_recent_first_and_balance() {
        let db = test_db();
        let users = UserRepository::new(db.clone());
        let txs = TransactionRepository::new(db);

        let uid = seed_user(&users).await;

        txs.create(uid, "2025-01-02", "Salary", None, "income", 2000.0)
            .await
            .unwrap();
        txs.create(uid, "2025-01-05", "Grocery", Some("Food"), "expense", 150.0)
            .await
            .unwrap();
        txs.create(uid, "2025-01-03", "Rent", Some("Rent"), "expense", 1200.0)
            .await
            .unwrap();

        let recent = txs.find_by_user(uid, Some(2)).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].description, "Grocery");
        assert_eq!(recent[1].description, "Rent");

        let balance = txs.balance(uid).await.unwrap();
        assert!((balance - 650.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_expense_bumps_budget_spent() {
        let db = test_db();
        let users = UserRepository::new(db.clone());
        let budgets = BudgetRepository::new(db.clone());
        let txs = TransactionRepository::new(db);

        let uid = seed_user(&users).await;
        budgets.upsert(uid, "Food", 200.0).await.unwrap();

        txs.create(uid, "2025-01-05", "Grocery", Some("Food"), "expense", 150.0)
            .await
            .unwrap();
        txs.create(uid, "2025-01-06", "Takeout", Some("Food"), "expense", 80.0)
            .await
            .unwrap();
        // Income never counts against a budget
        txs.create(uid, "2025-01-07", "Refund", Some("Food"), "income", 30.0)
            .await
            .unwrap();

        let all = budgets.find_by_user(uid).await.unwrap();
        assert_eq!(all[0].spent, 230.0);

        let alerts = budgets.find_over_limit(uid).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, "Food");
    }

    #[tokio::test]
    async fn test_spending_by_category() {
        let db = test_db();
        let users = UserRepository::new(db.clone());
        let txs = TransactionRepository::new(db);

        let uid = seed_user(&users).await;

        txs.create(uid, "2025-01-01", "Rent", Some("Rent"), "expense", 1200.0)
            .await
            .unwrap();
        txs.create(uid, "2025-01-02", "Grocery", Some("Food"), "expense", 150.0)
            .await
            .unwrap();
        txs.create(uid, "2025-01-03", "Takeout", Some("Food"), "expense", 50.0)
            .await
            .unwrap();
        txs.create(uid, "2025-01-04", "Salary", None, "income", 2000.0)
            .await
            .unwrap();

        let report = txs.spending_by_category(uid).await.unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].category, "Rent");
        assert_eq!(report[0].total, 1200.0);
        assert_eq!(report[1].category, "Food");
        assert_eq!(report[1].total, 200.0);
    }

    #[tokio::test]
    async fn test_queries_scoped_to_user() {
        let db = test_db();
        let users = UserRepository::new(db.clone());
        let txs = TransactionRepository::new(db);

        let alice = users.create("a@x.com", "alice", "h1").await.unwrap();
        let bob = users.create("b@x.com", "bob", "h2").await.unwrap();

        txs.create(alice, "2025-01-01", "Salary", None, "income", 2000.0)
            .await
            .unwrap();

        assert_eq!(txs.find_by_user(alice, None).await.unwrap().len(), 1);
        assert!(txs.find_by_user(bob, None).await.unwrap().is_empty());
        assert_eq!(txs.balance(bob).await.unwrap(), 0.0);
    }
}
