pub mod common;
pub mod ledger;

pub use common::{CreatedResponse, SuccessResponse};
pub use ledger::{
    BalanceResponse, BudgetUpsertRequest, DashboardView, NewTransactionRequest,
    TransactionListQuery,
};
