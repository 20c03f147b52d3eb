pub mod budgets;
pub mod dashboard;
pub mod transactions;

pub use budgets::*;
pub use dashboard::*;
pub use transactions::*;

use crate::auth::service::AuthService;
use crate::core::config::Config;
use crate::db::repository::{BudgetRepository, TransactionRepository};
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub budget_repo: Arc<BudgetRepository>,
    pub transaction_repo: Arc<TransactionRepository>,
    pub auth: Arc<AuthService>,
    pub config: Arc<Config>,
}
