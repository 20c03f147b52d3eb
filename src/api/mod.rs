//! API module
//!
//! HTTP surface: server, routes, middleware, and request handlers.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
