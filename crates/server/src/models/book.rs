//! Catalog entry types.
//!
//! JSON field names follow the `exemplares` table so the existing pages keep
//! working unchanged.

use serde::Serialize;

use bookshelf_core::BookId;

/// A catalog entry as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: BookId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "editora")]
    pub publisher: String,
    #[serde(rename = "ano_publicacao")]
    pub publication_year: i32,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "sinopse")]
    pub synopsis: String,
    #[serde(rename = "capa_url")]
    pub cover_url: String,
}

/// The seven mandatory fields of a catalog entry, already validated.
///
/// Used for both create and full-replacement update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub publication_year: i32,
    pub genre: String,
    pub synopsis: String,
    pub cover_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_serializes_with_table_field_names() {
        let book = Book {
            id: BookId::new(3),
            title: "Dom Casmurro".to_string(),
            author: "Machado de Assis".to_string(),
            publisher: "Garnier".to_string(),
            publication_year: 1899,
            genre: "Romance".to_string(),
            synopsis: "Bentinho e Capitu.".to_string(),
            cover_url: "https://example.com/capa.jpg".to_string(),
        };

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["titulo"], "Dom Casmurro");
        assert_eq!(json["ano_publicacao"], 1899);
        assert_eq!(json["capa_url"], "https://example.com/capa.jpg");
        assert!(json.get("title").is_none());
    }
}
