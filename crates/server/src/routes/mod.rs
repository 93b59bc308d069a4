//! HTTP route handlers for the bookshelf server.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                       - Main page (requires login)
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (database)
//!
//! # Accounts (HTML forms, answered with redirects)
//! POST   /cadastrar              - Register
//! POST   /login                  - Login
//! GET    /logout                 - Logout
//!
//! # JSON API
//! GET    /api/user               - Current session status
//! GET    /api/exemplares         - List catalog (requires login)
//! POST   /api/exemplares         - Create entry (administrator)
//! GET    /api/exemplares/{id}    - Get entry (requires login)
//! PUT    /api/exemplares/{id}    - Replace entry (administrator)
//! DELETE /api/exemplares/{id}    - Delete entry (administrator)
//! ```
//!
//! Anything else falls through to the static files of the public directory.

pub mod auth;
pub mod books;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog API routes.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/api/exemplares", get(books::list).post(books::create))
        .route(
            "/api/exemplares/{id}",
            get(books::show).put(books::update).delete(books::delete),
        )
}

/// Create all routes for the bookshelf server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health))
        .route("/health/ready", get(pages::readiness))
        .route("/api/user", get(pages::current_user))
        .route("/cadastrar", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .merge(book_routes())
}
