//! Route guard
//!
//! A pure predicate over session state plus the axum middleware that
//! applies it to protected routes. Anonymous requests are sent to the
//! login page with a one-shot message; the message travels on the
//! decision (and as a `flash` cookie on the redirect), never through
//! ambient mutable state.

use crate::auth::models::UserSnapshot;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

/// Where denied requests are sent
pub const LOGIN_REDIRECT: &str = "/login";

/// One-shot message attached to denials
pub const LOGIN_PROMPT: &str = "Please log in to access this page";

/// Cookie used to carry one-shot messages to the next rendered view
pub const FLASH_COOKIE: &str = "flash";

/// Outcome of authorizing a request against its session state
#[derive(Debug, Clone, PartialEq)]
pub enum AuthDecision {
    /// A live session accompanies the request
    Allow(UserSnapshot),
    /// No live session; redirect with an optional one-shot message
    Deny {
        redirect: &'static str,
        message: Option<&'static str>,
    },
}

/// Decide whether a request may reach protected content
///
/// Pure predicate: allow iff a live session snapshot is present. No side
/// effects beyond the decision itself.
pub fn authorize(session: Option<UserSnapshot>) -> AuthDecision {
    match session {
        Some(snapshot) => AuthDecision::Allow(snapshot),
        None => AuthDecision::Deny {
            redirect: LOGIN_REDIRECT,
            message: Some(LOGIN_PROMPT),
        },
    }
}

/// Authenticated user injected into request extensions by the guard
#[derive(Clone, Debug)]
pub struct CurrentUser(pub UserSnapshot);

/// Guard middleware for protected routes
///
/// Resolves the session cookie against the session store, applies
/// [`authorize`], and either forwards the request with the snapshot
/// attached or redirects to the login page.
pub async fn require_session(
    State(state): State<crate::api::handlers::AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie_name.as_str();

    let session = match jar.get(cookie_name) {
        Some(cookie) => state.auth.resolve_session(cookie.value()).await,
        None => None,
    };

    match authorize(session) {
        AuthDecision::Allow(snapshot) => {
            request.extensions_mut().insert(CurrentUser(snapshot));
            next.run(request).await
        }
        AuthDecision::Deny { redirect, message } => {
            tracing::debug!(uri = %request.uri(), "Unauthenticated request denied");
            deny_response(jar, redirect, message)
        }
    }
}

/// Build the redirect response for a denial, carrying the one-shot message
fn deny_response(jar: CookieJar, redirect: &str, message: Option<&str>) -> Response {
    let jar = match message {
        Some(message) => jar.add(
            Cookie::build((FLASH_COOKIE, message.to_string()))
                .path("/")
                .build(),
        ),
        None => jar,
    };
    (jar, Redirect::to(redirect)).into_response()
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = crate::core::error::LedgerError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> crate::core::error::Result<Self> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(crate::core::error::LedgerError::AuthenticationRequired)
    }
}
