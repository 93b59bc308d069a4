//! Virtual Bookshelf server library.
//!
//! Accounts, sessions and the catalog API, served with axum. The binary in
//! `main.rs` wires configuration, the `PostgreSQL` pool and the session store
//! into [`app`]; tests build the same router over an in-memory session store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

use axum::{Router, extract::Request};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;

/// Build the complete application router.
///
/// Requests not matched by a route are served from the public directory.
pub fn app<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    let public_dir = ServeDir::new(&state.config().public_dir);

    Router::new()
        .merge(routes::routes())
        .fallback_service(public_dir)
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
