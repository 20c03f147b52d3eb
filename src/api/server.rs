//! HTTP Server implementation
//!
//! This module provides the HTTP server using Axum framework with:
//! - Configurable host/port binding
//! - Graceful shutdown handling
//! - Health check endpoint
//! - CORS support

use crate::api::handlers::AppState;
use crate::api::middleware::trace_id_middleware;
use crate::api::routes::build_api_routes;
use crate::auth::service::AuthService;
use crate::auth::session::SessionManager;
use crate::core::config::{Config, ServerConfig};
use crate::db::manager::DatabaseManager;
use crate::db::repository::{BudgetRepository, TransactionRepository, UserRepository};
use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server with the given configuration and database manager
    pub fn new(config: Config, db: Arc<DatabaseManager>) -> anyhow::Result<Self> {
        let server_config = config.server.clone();
        let router = Self::build_router(config, db);

        Ok(Self {
            router,
            config: server_config,
        })
    }

    /// Build the Axum router with all routes and middleware
    fn build_router(config: Config, db: Arc<DatabaseManager>) -> Router {
        // Create repositories
        let user_repo = Arc::new(UserRepository::new(db.clone()));
        let budget_repo = Arc::new(BudgetRepository::new(db.clone()));
        let transaction_repo = Arc::new(TransactionRepository::new(db));

        // Create the session store and the auth service on top of it
        let sessions = Arc::new(SessionManager::new(Duration::from_secs(
            config.session.ttl_secs,
        )));
        let auth = Arc::new(AuthService::new(
            user_repo,
            sessions,
            config.security.bcrypt_cost,
        ));

        let allowed_origins = config.security.allowed_origins.clone();

        let app_state = AppState {
            budget_repo,
            transaction_repo,
            auth,
            config: Arc::new(config),
        };

        Router::new()
            .route("/health", get(health_check))
            .merge(build_api_routes(app_state))
            .layer(
                ServiceBuilder::new()
                    // Add trace ID middleware for request tracking
                    .layer(middleware::from_fn(trace_id_middleware))
                    // Add tracing for all requests
                    .layer(TraceLayer::new_for_http())
                    // Add CORS support
                    .layer(Self::build_cors_layer(&allowed_origins)),
            )
    }

    /// Build CORS layer from allowed origins configuration
    fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
        use tower_http::cors::Any;

        let cors = CorsLayer::new();

        if allowed_origins.contains(&"*".to_string()) {
            cors.allow_origin(Any).allow_methods(Any).allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            cors.allow_origin(origins).allow_methods(Any).allow_headers(Any)
        }
    }

    /// Start the HTTP server and listen for requests
    ///
    /// This method will block until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            request_timeout = self.config.request_timeout,
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Get a reference to the router
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_server_creation() {
        let mut config = Config::defaults().unwrap();
        config.security.bcrypt_cost = 4;

        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let server = ApiServer::new(config, db);
        assert!(server.is_ok());
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await;
        let value = response.0;

        assert_eq!(value["status"], "ok");
        assert!(value["version"].is_string());
        assert!(value["timestamp"].is_number());
    }
}
