//! Dashboard and report handlers

use crate::api::handlers::AppState;
use crate::api::models::{BalanceResponse, DashboardView};
use crate::auth::guard::CurrentUser;
use crate::core::error::Result;
use crate::db::models::{Budget, CategorySpend};
use axum::{extract::State, Json};

/// Number of ledger entries shown on the dashboard
const RECENT_LIMIT: u32 = 5;

/// Handler for GET / - the authenticated user's dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardView>> {
    let balance = state.transaction_repo.balance(user.id).await?;
    let recent_transactions = state
        .transaction_repo
        .find_by_user(user.id, Some(RECENT_LIMIT))
        .await?;

    Ok(Json(DashboardView {
        user,
        balance,
        recent_transactions,
    }))
}

/// Handler for GET /api/balance - running balance
pub async fn get_balance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<BalanceResponse>> {
    let balance = state.transaction_repo.balance(user.id).await?;
    Ok(Json(BalanceResponse { balance }))
}

/// Handler for GET /api/reports/spending - expense totals by category
pub async fn spending_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CategorySpend>>> {
    let report = state.transaction_repo.spending_by_category(user.id).await?;
    Ok(Json(report))
}

/// Handler for GET /api/budgets/alerts - budgets spending past their limit
pub async fn budget_alerts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Budget>>> {
    let alerts = state.budget_repo.find_over_limit(user.id).await?;
    Ok(Json(alerts))
}
