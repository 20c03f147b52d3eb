//! Authentication module
//!
//! This module provides authentication functionality including:
//! - User registration, login, and logout
//! - Password hashing and verification
//! - The in-process session store
//! - The route guard protecting authenticated views

pub mod guard;
pub mod handlers;
pub mod models;
pub mod password;
pub mod service;
pub mod session;

pub use guard::{authorize, require_session, AuthDecision, CurrentUser};
pub use models::UserSnapshot;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use session::SessionManager;
