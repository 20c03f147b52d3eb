//! Database models
//!
//! Data structures representing database tables

use serde::{Deserialize, Serialize};

/// User record in the database
///
/// `password_hash` holds the bcrypt hash stored in the `password` column;
/// the plaintext never reaches this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

/// Budget record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub limit_amount: f64,
    pub spent: f64,
    pub created_at: String,
}

impl Budget {
    /// Whether spending has exceeded the configured limit
    pub fn is_over_limit(&self) -> bool {
        self.spent > self.limit_amount
    }
}

/// Transaction record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    /// ISO date of the ledger entry (YYYY-MM-DD)
    pub date: String,
    pub description: String,
    pub category: Option<String>,
    /// 'income' or 'expense', stored in the `type` column
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: f64,
    pub created_at: String,
}

/// Per-category expense total for the spending report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    pub total: f64,
}
