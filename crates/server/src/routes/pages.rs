//! Page and session-status handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use bookshelf_core::Role;

use crate::middleware::{OptionalUser, RequireUser};
use crate::state::AppState;

/// Serve the main page (`GET /`) to logged-in users.
///
/// Anonymous visitors are redirected to the login page by `RequireUser`.
pub async fn index(RequireUser(user): RequireUser, State(state): State<AppState>) -> Response {
    let path = state.config().public_dir.join("index.html");

    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::warn!(
                user_id = %user.id,
                path = %path.display(),
                error = %e,
                "Main page not readable"
            );
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Body of `GET /api/user`.
#[derive(Debug, Serialize)]
pub struct UserStatus {
    pub logged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<Role>,
}

/// Report who is logged in (`GET /api/user`).
///
/// Never redirects: anonymous sessions get `{"logged": false}`.
pub async fn current_user(OptionalUser(user): OptionalUser) -> Json<UserStatus> {
    Json(match user {
        Some(user) => UserStatus {
            logged: true,
            nome: Some(user.name),
            tipo: Some(user.role),
        },
        None => UserStatus {
            logged: false,
            nome: None,
            tipo: None,
        },
    })
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
