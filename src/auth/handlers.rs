//! Authentication HTTP handlers
//!
//! Form endpoints follow the reference behavior for browser flows: auth
//! failures are HTTP 200 with a single user-facing error string (the view
//! re-renders the form), successes redirect, and logout always redirects
//! to the login page no matter what happened internally.

use crate::api::handlers::AppState;
use crate::auth::guard::{CurrentUser, FLASH_COOKIE};
use crate::auth::models::{FormResponse, LoginForm, RegisterForm, UserSnapshot};
use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Handler for POST /register - user registration
///
/// A request already carrying a live session is a no-op redirect home.
/// Registration success redirects to the login page; it never logs the
/// user in.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if has_live_session(&state, &jar).await {
        return Redirect::to("/").into_response();
    }

    match state.auth.register(&form).await {
        Ok(_user_id) => {
            let jar = jar.add(
                Cookie::build((FLASH_COOKIE, "Registration successful. Please login"))
                    .path("/")
                    .build(),
            );
            (jar, Redirect::to("/login")).into_response()
        }
        Err(e) if e.is_user_recoverable() => {
            Json(FormResponse::failure(e.to_string())).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Registration failed");
            Json(FormResponse::failure("Error occurred during registration.")).into_response()
        }
    }
}

/// Handler for POST /login - user login
///
/// Success sets the session cookie and redirects home. Failure responses
/// never disclose whether the email or the password was wrong.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if has_live_session(&state, &jar).await {
        return Redirect::to("/").into_response();
    }

    match state.auth.login(&form).await {
        Ok(session) => {
            let cookie = Cookie::build((state.config.session.cookie_name.clone(), session.token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            (jar.add(cookie), Redirect::to("/")).into_response()
        }
        Err(e) if e.is_user_recoverable() => {
            Json(FormResponse::failure(e.to_string())).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            Json(FormResponse::failure(
                "An error occurred during login. Please try again.",
            ))
            .into_response()
        }
    }
}

/// Handler for GET /logout - destroy the session
///
/// Best-effort: the response is a redirect to the login page whether or
/// not a session existed, and calling it twice is harmless.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(&state.config.session.cookie_name) {
        state.auth.logout(cookie.value()).await;
    }

    let removal = Cookie::build((state.config.session.cookie_name.clone(), ""))
        .path("/")
        .build();
    (jar.remove(removal), Redirect::to("/login")).into_response()
}

/// Handler for GET /api/me - the authenticated user's snapshot
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserSnapshot> {
    Json(user)
}

async fn has_live_session(state: &AppState, jar: &CookieJar) -> bool {
    match jar.get(&state.config.session.cookie_name) {
        Some(cookie) => state.auth.resolve_session(cookie.value()).await.is_some(),
        None => false,
    }
}
