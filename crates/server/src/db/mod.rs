//! Database operations for the bookshelf `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `usuarios` - Accounts (name, email, Argon2 password hash, role)
//! - `exemplares` - Catalog entries
//! - `tower_sessions.session` - Server-side session records (tower-sessions)
//!
//! Every statement binds its inputs as parameters (`$1..$n`); SQL text is
//! never built from request data.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bookshelf-cli -- migrate
//! ```

pub mod books;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use books::BookRepository;
pub use users::UserRepository;

/// Schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Unique constraint on `usuarios.email`.
const USER_EMAIL_CONSTRAINT: &str = "usuarios_email_key";
/// Partial unique index allowing a single `administrador` row.
const SINGLE_ADMINISTRATOR_INDEX: &str = "usuarios_single_administrador";
/// Unique constraint on `exemplares.titulo`.
const BOOK_TITLE_CONSTRAINT: &str = "exemplares_titulo_key";

/// Which uniqueness rule a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Another account already uses this email.
    DuplicateEmail,
    /// An administrator account already exists.
    DuplicateAdministrator,
    /// Another catalog entry already has this title.
    DuplicateTitle,
    /// Some other unique constraint.
    Other,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::DuplicateEmail => "email already exists",
            Self::DuplicateAdministrator => "administrator already exists",
            Self::DuplicateTitle => "title already exists",
            Self::Other => "unique constraint violated",
        };
        f.write_str(text)
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(ConflictKind),
}

impl RepositoryError {
    /// Classify a sqlx error, turning unique violations into `Conflict`.
    fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_kind(db_err.constraint()));
        }
        Self::Database(err)
    }
}

/// Map a violated constraint name to the rule it enforces.
fn conflict_kind(constraint: Option<&str>) -> ConflictKind {
    match constraint {
        Some(USER_EMAIL_CONSTRAINT) => ConflictKind::DuplicateEmail,
        Some(SINGLE_ADMINISTRATOR_INDEX) => ConflictKind::DuplicateAdministrator,
        Some(BOOK_TITLE_CONSTRAINT) => ConflictKind::DuplicateTitle,
        _ => ConflictKind::Other,
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// Connections are acquired per query and returned to the pool when the
/// query future completes or fails.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
