//! Integration tests for the Virtual Bookshelf.
//!
//! These tests run against a real `PostgreSQL` database and are ignored by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! export BOOKSHELF_TEST_DATABASE_URL=postgres://localhost/bookshelf_test
//! cargo test -p bookshelf-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `accounts` - Registration, administrator rule, login
//! - `catalog` - Catalog repository
//! - `http_flow` - The full server over HTTP with `PostgreSQL` sessions
//!
//! Tests share one database and run concurrently, so each one works on its own
//! uniquely named rows. The single administrator is shared through
//! [`ensure_admin`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use secrecy::SecretString;
use sqlx::PgPool;
use tower_sessions_sqlx_store::PostgresStore;
use uuid::Uuid;

use bookshelf_server::config::ServerConfig;
use bookshelf_server::db::{self, MIGRATOR};
use bookshelf_server::middleware::create_session_layer;
use bookshelf_server::models::{NewBook, User};
use bookshelf_server::services::auth::{AuthError, AuthService};
use bookshelf_server::state::AppState;
use bookshelf_server::validation::{Credentials, RegisterForm, Registration};

/// Email of the shared test administrator.
pub const ADMIN_EMAIL: &str = "admin@bookshelf.test";
/// Password of the shared test administrator.
pub const ADMIN_PASSWORD: &str = "admin-password";

fn database_url() -> SecretString {
    std::env::var("BOOKSHELF_TEST_DATABASE_URL")
        .map(SecretString::from)
        .expect("BOOKSHELF_TEST_DATABASE_URL must be set")
}

/// Connect to the test database and apply all migrations.
pub async fn test_pool() -> PgPool {
    let pool = db::create_pool(&database_url(), 5)
        .await
        .expect("Failed to connect to test database");

    MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    PostgresStore::new(pool.clone())
        .migrate()
        .await
        .expect("Failed to create session table");

    pool
}

/// A value no other test uses.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Build a validated registration.
#[must_use]
pub fn registration(name: &str, email: &str, password: &str, role: &str) -> Registration {
    RegisterForm {
        nome: Some(name.to_owned()),
        email: Some(email.to_owned()),
        senha: Some(password.to_owned()),
        tipo: Some(role.to_owned()),
    }
    .validate()
    .expect("test registration must be valid")
}

/// Register a fresh standard user and return it with its password.
pub async fn register_user(pool: &PgPool) -> (User, String) {
    let name = unique("leitor");
    let email = format!("{name}@bookshelf.test");
    let password = unique("pw");

    let user = AuthService::new(pool)
        .register(registration(&name, &email, &password, "usuario"))
        .await
        .expect("Failed to register test user");

    (user, password)
}

/// Return the administrator, creating it on first use.
pub async fn ensure_admin(pool: &PgPool) -> User {
    let service = AuthService::new(pool);

    match service
        .register(registration(
            "Administrador",
            ADMIN_EMAIL,
            ADMIN_PASSWORD,
            "administrador",
        ))
        .await
    {
        Ok(user) => user,
        Err(AuthError::AdministratorExists | AuthError::EmailTaken) => service
            .login(&Credentials {
                identifier: ADMIN_EMAIL.to_owned(),
                password: ADMIN_PASSWORD.to_owned(),
            })
            .await
            .expect("the existing administrator must use the test credentials"),
        Err(e) => panic!("Failed to create administrator: {e}"),
    }
}

/// A complete catalog entry with the given title.
#[must_use]
pub fn sample_book(title: &str) -> NewBook {
    NewBook {
        title: title.to_owned(),
        author: "Machado de Assis".to_owned(),
        publisher: "Garnier".to_owned(),
        publication_year: 1899,
        genre: "Romance".to_owned(),
        synopsis: "Bentinho e Capitu.".to_owned(),
        cover_url: "https://example.com/capa.jpg".to_owned(),
    }
}

/// Serve the full application on an ephemeral port and return its base URL.
///
/// Sessions are stored in `PostgreSQL`, as in production.
pub async fn spawn_server(pool: PgPool) -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    let base_url = format!("http://{addr}");

    let config = ServerConfig {
        database_url: database_url(),
        host: addr.ip(),
        port: addr.port(),
        base_url: base_url.parse().expect("valid base URL"),
        public_dir: std::env::temp_dir(),
        max_db_connections: 5,
        sentry_dsn: None,
        sentry_environment: None,
    };
    let session_layer = create_session_layer(PostgresStore::new(pool.clone()), false);
    let app = bookshelf_server::app(AppState::new(config, pool), session_layer);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("test server failed");
    });

    base_url
}

/// HTTP client that keeps cookies and does not follow redirects.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
