//! FinLedger Backend Library
//!
//! This library provides the core functionality for the FinLedger backend:
//! session-based authentication and the budget/transaction ledger over a
//! SQLite store, served as a REST API.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use crate::core::Config;
pub use api::ApiServer;
pub use auth::{AuthService, SessionManager};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for the library
pub type Result<T> = anyhow::Result<T>;
