//! Account management command.
//!
//! Goes through the same validation, hashing and single-administrator rule as
//! the registration form; this is how the administrator account is created.

use bookshelf_server::services::auth::{AuthError, AuthService};
use bookshelf_server::validation::RegisterForm;

use super::{CliError, connect};

/// Create a new account and return its ID.
///
/// # Errors
///
/// Returns `CliError::Auth` if the input is invalid, the email is taken or an
/// administrator already exists.
pub async fn create(
    name: String,
    email: String,
    password: String,
    role: String,
) -> Result<i32, CliError> {
    let registration = RegisterForm {
        nome: Some(name),
        email: Some(email),
        senha: Some(password),
        tipo: Some(role),
    }
    .validate()
    .map_err(AuthError::from)?;

    let pool = connect().await?;
    let user = AuthService::new(&pool).register(registration).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );

    Ok(user.id.as_i32())
}
