//! User repository for database operations.
//!
//! This module is the credential store: it owns the `usuarios` rows and
//! enforces email uniqueness together with the single-administrator index.

use sqlx::PgPool;

use bookshelf_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::user::{NewUser, User};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `usuarios` queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    nome: String,
    email: String,
    tipo: Role,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.nome,
            email,
            role: row.tipo,
        })
    }
}

/// Row type for lookups that also need the stored password hash.
#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    senha: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by email address or display name, with the password hash.
    ///
    /// Names are not unique; when several accounts match, the oldest wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn find_by_email_or_name(
        &self,
        key: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            r"
            SELECT id, nome, email, tipo, senha
            FROM usuarios
            WHERE lower(email) = lower($1) OR nome = $1
            ORDER BY id
            LIMIT 1
            ",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((r.user.try_into()?, r.senha))),
            None => Ok(None),
        }
    }

    /// Get a user by their email address, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, nome, email, tipo
            FROM usuarios
            WHERE lower(email) = lower($1)
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Whether an administrator account already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_administrator(&self) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS (SELECT 1 FROM usuarios WHERE tipo = $1)
            ",
        )
        .bind(Role::Administrator)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict(DuplicateEmail)` if the email is taken.
    /// Returns `RepositoryError::Conflict(DuplicateAdministrator)` if this would
    /// create a second administrator.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO usuarios (nome, email, senha, tipo)
            VALUES ($1, $2, $3, $4)
            RETURNING id, nome, email, tipo
            ",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        row.try_into()
    }
}
