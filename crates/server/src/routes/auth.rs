//! Account route handlers.
//!
//! Registration, login and logout. Bodies may be HTML form posts or JSON;
//! either way every outcome is a redirect back to one of the static pages with an `error` or
//! `success` query parameter; only unexpected server failures produce a 500.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::auth::LOGIN_PAGE;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;
use crate::validation::{Input, LoginForm, RegisterForm};

/// Registration page, target of registration error redirects.
const REGISTER_PAGE: &str = "/cadastro.html";

/// Redirect to `page` carrying the error code, or answer 500 with `message`.
fn auth_failure(page: &str, err: &AuthError, message: &'static str) -> Response {
    if let Some(code) = err.redirect_code() {
        tracing::debug!(error = %err, code, "Account request rejected");
        return Redirect::to(&format!("{page}?error={code}")).into_response();
    }

    let event_id = sentry::capture_error(err);
    tracing::error!(error = %err, sentry_event_id = %event_id, "Account request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

/// Handle a registration submission (`POST /cadastrar`).
pub async fn register(
    State(state): State<AppState>,
    Input(form): Input<RegisterForm>,
) -> Response {
    const SERVER_ERROR: &str = "Erro no servidor ao cadastrar";

    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(e) => return auth_failure(REGISTER_PAGE, &e.into(), SERVER_ERROR),
    };

    match AuthService::new(state.pool()).register(registration).await {
        Ok(_) => Redirect::to(&format!("{LOGIN_PAGE}?success=cadastrado")).into_response(),
        Err(e) => auth_failure(REGISTER_PAGE, &e, SERVER_ERROR),
    }
}

/// Handle a login submission (`POST /login`).
///
/// On success the session is re-keyed and receives the user's claims with an
/// absolute one-hour expiry.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Input(form): Input<LoginForm>,
) -> Response {
    const SERVER_ERROR: &str = "Erro no servidor durante login";

    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(e) => return auth_failure(LOGIN_PAGE, &e.into(), SERVER_ERROR),
    };

    let user = match AuthService::new(state.pool()).login(&credentials).await {
        Ok(user) => user,
        Err(e) => return auth_failure(LOGIN_PAGE, &e, SERVER_ERROR),
    };

    let claims = CurrentUser::from_login(&user, Utc::now());
    if let Err(e) = set_current_user(&session, &claims).await {
        let event_id = sentry::capture_error(&e);
        tracing::error!(error = %e, sentry_event_id = %event_id, "Failed to set session");
        return (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response();
    }

    set_sentry_user(&user.id);
    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Redirect::to("/").into_response()
}

/// Handle logout (`GET /logout`).
///
/// Deletes the session record; the session cookie is cleared on the response.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        let event_id = sentry::capture_error(&e);
        tracing::error!(error = %e, sentry_event_id = %event_id, "Failed to destroy session");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao fazer logout").into_response();
    }

    clear_sentry_user();

    Redirect::to(LOGIN_PAGE).into_response()
}
