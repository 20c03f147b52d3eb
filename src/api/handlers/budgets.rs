//! Budget handlers

use crate::api::handlers::AppState;
use crate::api::models::{BudgetUpsertRequest, SuccessResponse};
use crate::auth::guard::CurrentUser;
use crate::core::error::{LedgerError, Result};
use crate::db::models::Budget;
use axum::{
    extract::{Path, State},
    Json,
};

/// Handler for GET /api/budgets - the user's budgets
pub async fn list_budgets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Budget>>> {
    let budgets = state.budget_repo.find_by_user(user.id).await?;
    Ok(Json(budgets))
}

/// Handler for POST /api/budgets - create or update a category budget
pub async fn upsert_budget(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<BudgetUpsertRequest>,
) -> Result<Json<SuccessResponse>> {
    req.validate()?;

    state
        .budget_repo
        .upsert(user.id, req.category.trim(), req.limit_amount)
        .await?;

    tracing::info!(user_id = user.id, category = %req.category, "Budget upserted");

    Ok(Json(SuccessResponse::ok()))
}

/// Handler for DELETE /api/budgets/:category - remove a category budget
pub async fn delete_budget(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(category): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let removed = state.budget_repo.delete_by_category(user.id, &category).await?;
    if !removed {
        return Err(LedgerError::NotFound(format!("budget '{}'", category)));
    }

    tracing::info!(user_id = user.id, category = %category, "Budget deleted");

    Ok(Json(SuccessResponse::ok()))
}
