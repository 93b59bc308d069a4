//! Authentication service.
//!
//! Registration and password login against the credential store.

mod error;
pub mod password;

pub use error::AuthError;

use sqlx::PgPool;

use crate::db::users::UserRepository;
use crate::db::{ConflictKind, RepositoryError};
use crate::models::user::{NewUser, User};
use crate::validation::{Credentials, Registration};

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account.
    ///
    /// The administrator and email checks run before hashing so rejected
    /// requests stay cheap; the unique indexes catch concurrent registrations
    /// that slip past them.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AdministratorExists` when registering a second administrator.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    /// Returns `AuthError::PasswordHash` or `AuthError::Repository` on server failures.
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        if registration.role.is_administrator() && self.users.exists_administrator().await? {
            return Err(AuthError::AdministratorExists);
        }

        if self.users.find_by_email(&registration.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = password::hash_password(&registration.password)?;

        let user = self
            .users
            .insert(&NewUser {
                name: registration.name,
                email: registration.email,
                password_hash,
                role: registration.role,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(ConflictKind::DuplicateEmail) => AuthError::EmailTaken,
                RepositoryError::Conflict(ConflictKind::DuplicateAdministrator) => {
                    AuthError::AdministratorExists
                }
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(user)
    }

    /// Login with email (or display name) and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account matches the identifier.
    /// Returns `AuthError::WrongPassword` if the password does not verify.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .find_by_email_or_name(&credentials.identifier)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !password::verify_password(&credentials.password, &password_hash) {
            return Err(AuthError::WrongPassword);
        }

        Ok(user)
    }
}
