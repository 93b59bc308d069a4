//! Virtual Bookshelf CLI - Database migrations and account bootstrap.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema and session-store migrations
//! bookshelf-cli migrate
//!
//! # Create the administrator account
//! bookshelf-cli user create -n "Admin" -e admin@example.com -p secret -r administrador
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create an account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bookshelf-cli")]
#[command(author, version, about = "Virtual Bookshelf CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (prefer the environment variable over the flag)
        #[arg(short, long, env = "BOOKSHELF_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Role (`usuario` or `administrador`)
        #[arg(short, long, default_value = "usuario")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
                role,
            } => {
                commands::user::create(name, email, password, role).await?;
            }
        },
    }
    Ok(())
}
