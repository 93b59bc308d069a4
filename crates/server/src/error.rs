//! Unified error handling with Sentry integration.
//!
//! Provides the `AppError` type returned by the JSON API handlers. Server-side
//! failures are captured to Sentry and logged before a generic message is sent
//! to the client; every response body has the shape `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Body of 401 responses.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Não autenticado";
/// Body of 403 responses.
pub const FORBIDDEN_MESSAGE: &str = "Acesso não autorizado";

/// Application-level error type for the JSON API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed. `context` is the client-facing message.
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Request is missing fields or malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No valid session.
    #[error("Unauthorized")]
    Unauthorized,

    /// Session present but its role claim is insufficient.
    #[error("Forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Wrap a repository failure with the message shown to the client.
    #[must_use]
    pub fn database(context: &'static str, source: RepositoryError) -> Self {
        Self::Database { context, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database { .. }) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match self {
            Self::Database { context, .. } => context.to_string(),
            Self::Unauthorized => NOT_AUTHENTICATED_MESSAGE.to_string(),
            Self::Forbidden => FORBIDDEN_MESSAGE.to_string(),
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Exemplar não encontrado".to_string());
        assert_eq!(err.to_string(), "Not found: Exemplar não encontrado");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound("x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".to_string()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::database("x", RepositoryError::NotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_policy_errors_have_json_bodies() {
        let (status, body) = body_json(AppError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Não autenticado");

        let (status, body) = body_json(AppError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Acesso não autorizado");
    }

    #[tokio::test]
    async fn test_database_errors_hide_details() {
        let err = AppError::database(
            "Erro ao buscar exemplares",
            RepositoryError::DataCorruption("secret detail".to_string()),
        );
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Erro ao buscar exemplares" }));
    }
}
