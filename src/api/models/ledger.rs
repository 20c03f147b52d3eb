//! Request/response models for the ledger endpoints

use crate::auth::models::UserSnapshot;
use crate::core::error::{LedgerError, Result};
use crate::db::models::Transaction;
use serde::{Deserialize, Serialize};

/// Dashboard view: identity, running balance, and recent activity
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub user: UserSnapshot,
    pub balance: f64,
    pub recent_transactions: Vec<Transaction>,
}

/// Query parameters for transaction listing
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub limit: Option<u32>,
}

/// Payload for creating a ledger entry
#[derive(Debug, Deserialize)]
pub struct NewTransactionRequest {
    /// ISO date (YYYY-MM-DD); defaults to today when omitted
    pub date: Option<String>,
    pub description: String,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: f64,
}

impl NewTransactionRequest {
    /// Validate the payload; the first failing rule is reported
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::ValidationError(
                "Description is required".to_string(),
            ));
        }
        if self.tx_type != "income" && self.tx_type != "expense" {
            return Err(LedgerError::ValidationError(
                "Type must be 'income' or 'expense'".to_string(),
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(LedgerError::ValidationError(
                "Amount must be a positive number".to_string(),
            ));
        }
        if let Some(date) = &self.date {
            if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                return Err(LedgerError::ValidationError(
                    "Date must be in YYYY-MM-DD format".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Payload for creating or updating a budget
#[derive(Debug, Deserialize)]
pub struct BudgetUpsertRequest {
    pub category: String,
    #[serde(rename = "limit")]
    pub limit_amount: f64,
}

impl BudgetUpsertRequest {
    /// Validate the payload; the first failing rule is reported
    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(LedgerError::ValidationError(
                "Category is required".to_string(),
            ));
        }
        if !self.limit_amount.is_finite() || self.limit_amount <= 0.0 {
            return Err(LedgerError::ValidationError(
                "Limit must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response for GET /api/balance
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_transaction() -> NewTransactionRequest {
        NewTransactionRequest {
            date: Some("2025-01-05".to_string()),
            description: "Grocery".to_string(),
            category: Some("Food".to_string()),
            tx_type: "expense".to_string(),
            amount: 50.0,
        }
    }

    #[test]
    fn test_transaction_validation_accepts_valid() {
        assert!(valid_transaction().validate().is_ok());

        let mut no_date = valid_transaction();
        no_date.date = None;
        assert!(no_date.validate().is_ok());
    }

    #[test]
    fn test_transaction_validation_rejects_bad_input() {
        let mut blank = valid_transaction();
        blank.description = "   ".to_string();
        assert!(blank.validate().is_err());

        let mut bad_type = valid_transaction();
        bad_type.tx_type = "transfer".to_string();
        assert!(bad_type.validate().is_err());

        let mut negative = valid_transaction();
        negative.amount = -5.0;
        assert!(negative.validate().is_err());

        let mut nan = valid_transaction();
        nan.amount = f64::NAN;
        assert!(nan.validate().is_err());

        let mut bad_date = valid_transaction();
        bad_date.date = Some("05/01/2025".to_string());
        assert!(bad_date.validate().is_err());
    }

    #[test]
    fn test_budget_validation() {
        let valid = BudgetUpsertRequest {
            category: "Food".to_string(),
            limit_amount: 500.0,
        };
        assert!(valid.validate().is_ok());

        let empty = BudgetUpsertRequest {
            category: String::new(),
            limit_amount: 500.0,
        };
        assert!(empty.validate().is_err());

        let zero = BudgetUpsertRequest {
            category: "Food".to_string(),
            limit_amount: 0.0,
        };
        assert!(zero.validate().is_err());
    }
}
