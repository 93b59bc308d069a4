//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::validation::ValidationError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted form failed validation.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// An administrator account already exists.
    #[error("administrator already exists")]
    AdministratorExists,

    /// Another account uses this email.
    #[error("email already registered")]
    EmailTaken,

    /// No account matches the email or name.
    #[error("user not found")]
    UserNotFound,

    /// The password does not match the stored hash.
    #[error("incorrect password")]
    WrongPassword,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Error code carried in the `?error=` query string of the redirect, or
    /// `None` for server-side failures.
    #[must_use]
    pub fn redirect_code(&self) -> Option<&'static str> {
        match self {
            Self::Validation(ValidationError::MissingFields(_)) => Some("campos_vazios"),
            Self::Validation(ValidationError::InvalidEmail(_)) => Some("email_invalido"),
            Self::Validation(ValidationError::InvalidRole(_)) => Some("tipo_invalido"),
            Self::Validation(ValidationError::InvalidYear(_))
            | Self::PasswordHash
            | Self::Repository(_) => None,
            Self::AdministratorExists => Some("admin_existente"),
            Self::EmailTaken => Some("email_existente"),
            Self::UserNotFound => Some("usuario_nao_encontrado"),
            Self::WrongPassword => Some("senha_incorreta"),
        }
    }
}
