//! Session middleware configuration.
//!
//! Sets up cookie sessions using tower-sessions. The store is a parameter so
//! the server runs on `PostgresStore` while tests use `MemoryStore`.

use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore,
    cookie::{SameSite, time::Duration},
};

use crate::models::SESSION_LIFETIME_SECONDS;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bookshelf_session";

/// Create the session layer over `store`.
///
/// Sessions that were never logged in only live for one session lifetime of
/// inactivity; login replaces this with an absolute expiry.
///
/// # Arguments
///
/// * `store` - Session record store
/// * `secure` - Whether to set the cookie `Secure` flag (HTTPS deployments)
#[must_use]
pub fn create_session_layer<Store>(store: Store, secure: bool) -> SessionManagerLayer<Store>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_LIFETIME_SECONDS,
        )))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
