//! Database migration command.
//!
//! Applies the schema migrations embedded in `bookshelf-server`
//! (`crates/server/migrations/`) and creates the session store table.

use tower_sessions_sqlx_store::PostgresStore;

use bookshelf_server::db::MIGRATOR;

use super::{CliError, connect};

/// Run all migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running schema migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Creating session store table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
