//! Authentication request/response models

use serde::{Deserialize, Serialize};

/// Registration form payload
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login form payload
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Non-sensitive user identity carried in session state
///
/// This is the only user data a session may hold; the password hash
/// never crosses into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&crate::db::models::User> for UserSnapshot {
    fn from(user: &crate::db::models::User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Outcome of a login/registration form submission
///
/// Auth failures are served with HTTP 200 and a single user-facing error
/// string; the view layer re-renders the form with it.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FormResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
        }
    }
}
