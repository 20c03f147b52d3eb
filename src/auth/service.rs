//! Authentication service
//!
//! The single source of truth for the register/login/logout flow: input
//! validation, uniqueness checking, credential verification, and session
//! lifecycle. HTTP handlers stay thin on top of this.

use crate::auth::models::{LoginForm, RegisterForm, UserSnapshot};
use crate::auth::password;
use crate::auth::session::{Session, SessionManager};
use crate::core::error::{LedgerError, Result};
use crate::db::repository::UserRepository;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tokio::task;

const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Orchestrates registration, login, and logout over the credential store
/// and the session manager. Holds no mutable state of its own.
pub struct AuthService {
    users: Arc<UserRepository>,
    sessions: Arc<SessionManager>,
    bcrypt_cost: u32,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(users: Arc<UserRepository>, sessions: Arc<SessionManager>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            sessions,
            bcrypt_cost,
        }
    }

    /// Register a new user and return the assigned id
    ///
    /// Registration never creates a session; the caller must still log in.
    pub async fn register(&self, form: &RegisterForm) -> Result<i64> {
        validate_registration(form)?;

        tracing::info!(email = %form.email, "Registration attempt");

        // The UNIQUE constraint backstops this check under concurrency;
        // the early lookup just gives the common case a friendly path.
        if self.users.find_by_email(&form.email).await?.is_some() {
            tracing::warn!(email = %form.email, "Registration rejected: email taken");
            return Err(LedgerError::DuplicateEmail);
        }

        let password_hash = self.hash_on_blocking_pool(form.password.clone()).await?;
        let user_id = self
            .users
            .create(&form.email, &form.username, &password_hash)
            .await?;

        tracing::info!(user_id, email = %form.email, "User registered");
        Ok(user_id)
    }

    /// Authenticate credentials and open a session
    ///
    /// Unknown email and wrong password are both reported as
    /// InvalidCredentials; nothing in the result discloses which it was.
    pub async fn login(&self, form: &LoginForm) -> Result<Session> {
        validate_login(form)?;

        tracing::info!(email = %form.email, "Login attempt");

        let user = match self.users.find_by_email(&form.email).await? {
            Some(user) => user,
            None => {
                tracing::warn!(email = %form.email, "Login failed");
                return Err(LedgerError::InvalidCredentials);
            }
        };

        let password = form.password.clone();
        let hash = user.password_hash.clone();
        let is_match = task::spawn_blocking(move || password::verify_password(&password, &hash))
            .await
            .map_err(|e| LedgerError::TaskError(format!("Verification task panicked: {}", e)))??;

        if !is_match {
            tracing::warn!(email = %form.email, "Login failed");
            return Err(LedgerError::InvalidCredentials);
        }

        let session = self.sessions.create(UserSnapshot::from(&user)).await;
        tracing::info!(user_id = user.id, "Login successful");
        Ok(session)
    }

    /// Destroy the session behind the given token
    ///
    /// Returns whether a session existed. Either way the caller should
    /// treat the user as logged out; double logout is a no-op.
    pub async fn logout(&self, token: &str) -> bool {
        let existed = self.sessions.destroy(token).await;
        if existed {
            tracing::info!("Session destroyed");
        } else {
            tracing::debug!("Logout with no live session");
        }
        existed
    }

    /// Resolve a session token to its user snapshot, if still live
    pub async fn resolve_session(&self, token: &str) -> Option<UserSnapshot> {
        self.sessions.resolve(token).await
    }

    async fn hash_on_blocking_pool(&self, password: String) -> Result<String> {
        let cost = self.bcrypt_cost;
        task::spawn_blocking(move || password::hash_password_with_cost(&password, cost))
            .await
            .map_err(|e| LedgerError::TaskError(format!("Hashing task panicked: {}", e)))?
    }
}

/// Validate a registration form; the first failing rule is reported
fn validate_registration(form: &RegisterForm) -> Result<()> {
    if form.username.trim().is_empty() {
        return Err(LedgerError::ValidationError(
            "Username is required".to_string(),
        ));
    }
    if !EMAIL_RE.is_match(&form.email) {
        return Err(LedgerError::ValidationError(
            "Invalid email format".to_string(),
        ));
    }
    if form.password.len() < MIN_PASSWORD_LEN {
        return Err(LedgerError::ValidationError(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// Validate a login form; the first failing rule is reported
fn validate_login(form: &LoginForm) -> Result<()> {
    if !EMAIL_RE.is_match(&form.email) {
        return Err(LedgerError::ValidationError(
            "Invalid email format".to_string(),
        ));
    }
    if form.password.is_empty() {
        return Err(LedgerError::ValidationError(
            "Password is required".to_string(),
        ));
    }
    Ok(())
}
