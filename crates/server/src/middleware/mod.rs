//! HTTP middleware stack for the bookshelf server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions)
//!
//! Access control happens in the extractors from [`auth`].

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    OptionalUser, Policy, RequireAdmin, RequireUser, clear_current_user, set_current_user,
};
pub use request_id::request_id_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
