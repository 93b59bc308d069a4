//! Access control.
//!
//! Authorization is decided in one place, [`Policy::check`], from the claims
//! stored in the session at login. The extractors in this module apply a policy
//! to a handler and turn a denial into the right response for the route.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::{
    Expiry, Session,
    cookie::time::{Duration, OffsetDateTime},
};

use crate::error::AppError;
use crate::models::{CurrentUser, SESSION_LIFETIME_SECONDS, session_keys};

/// Where unauthenticated page requests are sent.
pub const LOGIN_PAGE: &str = "/login.html";

/// An access rule a route can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Any logged-in user.
    Authenticated,
    /// Only a session whose role claim is `administrador`.
    Administrator,
}

/// Why a policy refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No live session.
    NotAuthenticated,
    /// Session present, role claim insufficient.
    InsufficientRole,
}

impl Policy {
    /// Evaluate this policy against the current session claims.
    ///
    /// # Errors
    ///
    /// Returns the `Denial` explaining why access is refused.
    pub fn check(self, user: Option<&CurrentUser>) -> Result<(), Denial> {
        let user = user.ok_or(Denial::NotAuthenticated)?;

        match self {
            Self::Authenticated => Ok(()),
            Self::Administrator if user.role.is_administrator() => Ok(()),
            Self::Administrator => Err(Denial::InsufficientRole),
        }
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::NotAuthenticated => Self::Unauthorized,
            Denial::InsufficientRole => Self::Forbidden,
        }
    }
}

/// Read the live claims from the session.
///
/// Claims past their absolute lifetime flush the session, so the request is
/// handled as anonymous and the stale record is removed from the store.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    let user = match session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
        Ok(user) => user?,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session claims");
            return None;
        }
    };

    if user.is_expired(Utc::now()) {
        tracing::debug!(user_id = %user.id, "Session expired, flushing");
        if let Err(e) = session.flush().await {
            tracing::warn!(error = %e, "Failed to flush expired session");
        }
        return None;
    }

    Some(user)
}

async fn session_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    current_user(session).await
}

/// Extractor that requires a logged-in user.
///
/// Page routes redirect to the login page; `/api/` routes answer 401 JSON.
pub struct RequireUser(pub CurrentUser);

/// Error returned when a user is required but the session is anonymous.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PAGE).into_response(),
            Self::Unauthorized => AppError::Unauthorized.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session_user(parts).await;

        match Policy::Authenticated.check(user.as_ref()) {
            Ok(()) => user.map(Self).ok_or(AuthRejection::Unauthorized),
            Err(_) if parts.uri.path().starts_with("/api/") => Err(AuthRejection::Unauthorized),
            Err(_) => Err(AuthRejection::RedirectToLogin),
        }
    }
}

/// Extractor that requires an administrator session.
///
/// Anonymous requests get 401, non-administrators 403.
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session_user(parts).await;

        Policy::Administrator.check(user.as_ref())?;
        user.map(Self).ok_or(AppError::Unauthorized)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this never rejects the request.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Authenticate the session as `user`.
///
/// Cycles the session ID to prevent fixation, then pins an absolute expiry of
/// one session lifetime from now.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.set_expiry(Some(Expiry::AtDateTime(
        OffsetDateTime::now_utc() + Duration::seconds(SESSION_LIFETIME_SECONDS),
    )));
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Destroy the session (logout).
///
/// Deletes the stored record; the session layer then clears the cookie.
///
/// # Errors
///
/// Returns an error if the store delete fails.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
