//! Session-related types.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use bookshelf_core::{Email, Role, UserId};

use super::user::User;

/// Absolute session lifetime, counted from login.
pub const SESSION_LIFETIME_SECONDS: i64 = 60 * 60;

/// Session-stored user identity.
///
/// A copy of the account fields taken at login time. It is never refreshed
/// from the database, so it must not be treated as a live view of the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Display name at login time.
    pub name: String,
    /// Email at login time.
    pub email: Email,
    /// Role claim.
    pub role: Role,
    /// When the session was authenticated.
    pub issued_at: DateTime<Utc>,
}

impl CurrentUser {
    /// Build the claims for a freshly authenticated user.
    #[must_use]
    pub fn from_login(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            issued_at: now,
        }
    }

    /// When these claims stop authorizing anything.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::seconds(SESSION_LIFETIME_SECONDS)
    }

    /// Whether the claims are past their absolute lifetime at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
