//! FinLedger Backend - personal finance server
//!
//! Registration/login with cookie sessions, plus budgets, transactions,
//! and a dashboard backed by SQLite.

use fin_ledger::{api, core, db};

use anyhow::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print error to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging system based on configuration
    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting FinLedger Backend v{}", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );
    info!(
        path = ?config.database.path,
        "Database configuration"
    );

    // Initialize database (runs migrations)
    info!("Initializing database...");
    let db = std::sync::Arc::new(db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size as u32,
        std::time::Duration::from_millis(config.database.busy_timeout),
    )?);
    info!("Database initialized successfully");

    // Initialize API server
    info!("Initializing HTTP server...");
    let server_url = format!("http://{}:{}", config.server.host, config.server.port);
    let server = api::ApiServer::new(config, db)?;

    info!(url = %server_url, "Server ready - starting to serve requests");

    // Start serving (this will block until shutdown signal)
    server.serve().await?;

    Ok(())
}
