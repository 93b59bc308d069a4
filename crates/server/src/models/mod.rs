//! Domain models for the bookshelf server.

pub mod book;
pub mod session;
pub mod user;

pub use book::{Book, NewBook};
pub use session::{CurrentUser, SESSION_LIFETIME_SECONDS, keys as session_keys};
pub use user::{NewUser, User};
