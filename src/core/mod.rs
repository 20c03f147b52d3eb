//! Core module
//!
//! Cross-cutting concerns: configuration, error taxonomy, logging.

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{LedgerError, Result};
pub use logging::Logger;
