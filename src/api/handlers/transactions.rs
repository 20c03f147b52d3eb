//! Transaction handlers

use crate::api::handlers::AppState;
use crate::api::models::{CreatedResponse, NewTransactionRequest, TransactionListQuery};
use crate::auth::guard::CurrentUser;
use crate::core::error::Result;
use crate::db::models::Transaction;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

/// Handler for GET /api/transactions - the user's ledger, most recent first
pub async fn list_transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<Transaction>>> {
    let transactions = state
        .transaction_repo
        .find_by_user(user.id, query.limit)
        .await?;
    Ok(Json(transactions))
}

/// Handler for POST /api/transactions - record a ledger entry
pub async fn create_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<NewTransactionRequest>,
) -> Result<impl IntoResponse> {
    req.validate()?;

    let date = req
        .date
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());

    let id = state
        .transaction_repo
        .create(
            user.id,
            &date,
            req.description.trim(),
            req.category.as_deref(),
            &req.tx_type,
            req.amount,
        )
        .await?;

    tracing::info!(user_id = user.id, transaction_id = id, "Transaction recorded");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}
