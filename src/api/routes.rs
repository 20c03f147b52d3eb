//! API routes

use crate::api::handlers::{
    budget_alerts, create_transaction, dashboard, delete_budget, get_balance, list_budgets,
    list_transactions, spending_report, upsert_budget, AppState,
};
use crate::auth::guard::require_session;
use crate::auth::handlers::{login, logout, me, register};
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

/// Build the application routes
///
/// Public routes handle the auth flow itself; everything else sits behind
/// the route guard, which redirects anonymous requests to /login.
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", get(logout));

    // Protected routes (live session required)
    let protected_routes = Router::new()
        .route("/", get(dashboard))
        .route("/api/me", get(me))
        .route("/api/balance", get(get_balance))
        .route(
            "/api/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/api/budgets", get(list_budgets).post(upsert_budget))
        .route("/api/budgets/alerts", get(budget_alerts))
        .route("/api/budgets/:category", delete(delete_budget))
        .route("/api/reports/spending", get(spending_report))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    public_routes.merge(protected_routes).with_state(state)
}
