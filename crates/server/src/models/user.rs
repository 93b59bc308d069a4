//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use bookshelf_core::{Email, Role, UserId};

/// A registered account (domain type).
///
/// The password hash is deliberately absent; it only travels between the
/// repository and the password verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name (also accepted as a login identifier).
    pub name: String,
    /// Unique email address.
    pub email: Email,
    /// Permission tier.
    pub role: Role,
}

/// An account ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    /// Argon2 PHC string, never the plaintext.
    pub password_hash: String,
    pub role: Role,
}
