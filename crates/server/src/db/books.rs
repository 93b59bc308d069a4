//! Catalog repository for the `exemplares` table.

use sqlx::PgPool;

use bookshelf_core::BookId;

use super::RepositoryError;
use crate::models::book::{Book, NewBook};

/// Internal row type for `exemplares` queries.
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i32,
    titulo: String,
    autor: String,
    editora: String,
    ano_publicacao: i32,
    genero: String,
    sinopse: String,
    capa_url: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId::new(row.id),
            title: row.titulo,
            author: row.autor,
            publisher: row.editora,
            publication_year: row.ano_publicacao,
            genre: row.genero,
            synopsis: row.sinopse,
            cover_url: row.capa_url,
        }
    }
}

/// Repository for catalog database operations.
pub struct BookRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every catalog entry ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookRow>(
            r"
            SELECT id, titulo, autor, editora, ano_publicacao, genero, sinopse, capa_url
            FROM exemplares
            ORDER BY titulo
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Get a catalog entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            SELECT id, titulo, autor, editora, ano_publicacao, genero, sinopse, capa_url
            FROM exemplares
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    /// Insert a new catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict(DuplicateTitle)` if the title is taken;
    /// nothing is written in that case.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, book: &NewBook) -> Result<Book, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            INSERT INTO exemplares (titulo, autor, editora, ano_publicacao, genero, sinopse, capa_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, titulo, autor, editora, ano_publicacao, genero, sinopse, capa_url
            ",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(&book.genre)
        .bind(&book.synopsis)
        .bind(&book.cover_url)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }

    /// Replace all fields of an existing catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no entry has this ID.
    /// Returns `RepositoryError::Conflict(DuplicateTitle)` if another entry has the new title.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: BookId, book: &NewBook) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE exemplares
            SET titulo = $1, autor = $2, editora = $3, ano_publicacao = $4,
                genero = $5, sinopse = $6, capa_url = $7
            WHERE id = $8
            ",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(&book.genre)
        .bind(&book.synopsis)
        .bind(&book.cover_url)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no entry has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: BookId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM exemplares
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
