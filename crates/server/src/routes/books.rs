//! Catalog API handlers (`/api/exemplares`).
//!
//! Reads require a logged-in user; create, update and delete require an
//! administrator session. Access is checked before the path or body is
//! looked at.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use bookshelf_core::BookId;

use crate::db::{BookRepository, ConflictKind, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::{Book, NewBook};
use crate::state::AppState;
use crate::validation::{BookInput, Input, InputRejection, ValidationError};

const NOT_FOUND: &str = "Exemplar não encontrado";
const DUPLICATE_TITLE: &str = "Título já cadastrado";
const MISSING_FIELDS: &str = "Campos obrigatórios faltando";

/// Body of successful mutations.
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

const SUCCESS: Json<Success> = Json(Success { success: true });

/// Map a repository failure to the API error, with `context` as the 500 message.
fn catalog_error(context: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
    move |err| match err {
        RepositoryError::NotFound => AppError::NotFound(NOT_FOUND.to_string()),
        RepositoryError::Conflict(ConflictKind::DuplicateTitle) => {
            AppError::Conflict(DUPLICATE_TITLE.to_string())
        }
        other => AppError::database(context, other),
    }
}

/// A path segment that is not an ID names no entry.
fn parse_id(raw: &str) -> Result<BookId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(NOT_FOUND.to_string()))
}

/// Validate a catalog body, rejecting an unreadable body like missing fields.
fn parse_body(body: std::result::Result<Input<BookInput>, InputRejection>) -> Result<NewBook> {
    let Input(input) = body.map_err(|e| {
        tracing::debug!(error = %e, "Unreadable catalog body");
        AppError::BadRequest(MISSING_FIELDS.to_string())
    })?;

    input.validate().map_err(|e| match e {
        ValidationError::InvalidYear(_) => {
            AppError::BadRequest("Ano de publicação inválido".to_string())
        }
        _ => AppError::BadRequest(MISSING_FIELDS.to_string()),
    })
}

/// List all entries ordered by title (`GET /api/exemplares`).
///
/// # Errors
///
/// Returns 401 without a session, 500 if the query fails.
pub async fn list(
    RequireUser(_): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Book>>> {
    let books = BookRepository::new(state.pool())
        .list_all()
        .await
        .map_err(catalog_error("Erro ao buscar exemplares"))?;

    Ok(Json(books))
}

/// Get one entry (`GET /api/exemplares/{id}`).
///
/// # Errors
///
/// Returns 401 without a session, 404 if the entry doesn't exist.
pub async fn show(
    RequireUser(_): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>> {
    let id = parse_id(&id)?;

    BookRepository::new(state.pool())
        .get_by_id(id)
        .await
        .map_err(catalog_error("Erro ao buscar exemplar"))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

/// Create an entry (`POST /api/exemplares`).
///
/// # Errors
///
/// Returns 401/403 for non-administrators, 400 for missing fields and 409 if
/// the title is already catalogued.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    body: std::result::Result<Input<BookInput>, InputRejection>,
) -> Result<(StatusCode, Json<Success>)> {
    let book = parse_body(body)?;

    let created = BookRepository::new(state.pool())
        .create(&book)
        .await
        .map_err(catalog_error("Erro ao cadastrar exemplar"))?;

    tracing::info!(book_id = %created.id, user_id = %admin.id, "Catalog entry created");

    Ok((StatusCode::CREATED, SUCCESS))
}

/// Replace all fields of an entry (`PUT /api/exemplares/{id}`).
///
/// # Errors
///
/// Returns 401/403 for non-administrators, 400 for missing fields, 404 if the
/// entry doesn't exist and 409 if another entry has the new title.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Input<BookInput>, InputRejection>,
) -> Result<Json<Success>> {
    let id = parse_id(&id)?;
    let book = parse_body(body)?;

    BookRepository::new(state.pool())
        .update(id, &book)
        .await
        .map_err(catalog_error("Erro ao atualizar exemplar"))?;

    tracing::info!(book_id = %id, user_id = %admin.id, "Catalog entry updated");

    Ok(SUCCESS)
}

/// Delete an entry (`DELETE /api/exemplares/{id}`).
///
/// # Errors
///
/// Returns 401/403 for non-administrators and 404 if the entry doesn't exist.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success>> {
    let id = parse_id(&id)?;

    BookRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(catalog_error("Erro ao excluir exemplar"))?;

    tracing::info!(book_id = %id, user_id = %admin.id, "Catalog entry deleted");

    Ok(SUCCESS)
}
