//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BOOKSHELF_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `BOOKSHELF_HOST` - Bind address (default: 127.0.0.1)
//! - `BOOKSHELF_PORT` - Listen port (default: 3000)
//! - `BOOKSHELF_BASE_URL` - Public URL (default: <http://localhost:3000>).
//!   Session cookies are marked `Secure` when this is an `https` URL.
//! - `BOOKSHELF_PUBLIC_DIR` - Static pages directory (default: public)
//! - `BOOKSHELF_MAX_DB_CONNECTIONS` - Pool size (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
///
/// `Debug` never prints the database URL since it is a `SecretString`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: Url,
    /// Directory holding the static pages (`login.html`, `cadastro.html`, ...)
    pub public_dir: PathBuf,
    /// Maximum number of pooled database connections
    pub max_db_connections: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BOOKSHELF_DATABASE_URL")?;
        let host: IpAddr = parse_env("BOOKSHELF_HOST", "127.0.0.1")?;
        let port: u16 = parse_env("BOOKSHELF_PORT", "3000")?;
        let base_url = parse_base_url(&get_env_or_default(
            "BOOKSHELF_BASE_URL",
            "http://localhost:3000",
        ))?;
        let public_dir = PathBuf::from(get_env_or_default("BOOKSHELF_PUBLIC_DIR", "public"));
        let max_db_connections: u32 = parse_env("BOOKSHELF_MAX_DB_CONNECTIONS", "10")?;
        if max_db_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "BOOKSHELF_MAX_DB_CONNECTIONS".to_string(),
                "must be positive".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            public_dir,
            max_db_connections,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse and check the public base URL.
fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("BOOKSHELF_BASE_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BOOKSHELF_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}
