//! Request input records and their validation.
//!
//! Handlers deserialize request bodies into the loose `*Form`/`*Input`
//! records below (every field optional, exactly as a browser may send them)
//! and call `validate()` once. Only the validated records travel further into
//! services and repositories.
//!
//! Bodies arrive either as JSON or as urlencoded form posts; [`Input`] reads
//! both, picking the decoder from `Content-Type`.

use axum::{
    Form, Json,
    extract::{
        FromRequest, Request,
        rejection::{FormRejection, JsonRejection},
    },
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use bookshelf_core::{Email, EmailError, Role, RoleError};

use crate::models::NewBook;

/// Why an input record was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Required fields are absent or blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The email does not look like `local@domain.tld`.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The role is not `usuario` or `administrador`.
    #[error(transparent)]
    InvalidRole(#[from] RoleError),

    /// The publication year is not an integer.
    #[error("invalid publication year: {0}")]
    InvalidYear(String),
}

/// A request body decoded as JSON or as an urlencoded form.
///
/// JSON is used when `Content-Type` is `application/json` (or a `+json`
/// type); anything else goes through the form decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Input<T>(pub T);

/// Why a body could not be decoded into an [`Input`].
#[derive(Debug, Error)]
pub enum InputRejection {
    #[error(transparent)]
    Json(#[from] JsonRejection),
    #[error(transparent)]
    Form(#[from] FormRejection),
}

impl IntoResponse for InputRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(rejection) => rejection.into_response(),
            Self::Form(rejection) => rejection.into_response(),
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| {
            mime == "application/json"
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
}

impl<T, S> FromRequest<S> for Input<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = InputRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(Self(value))
        }
    }
}

/// Collects the names of missing fields while extracting the present ones.
#[derive(Default)]
struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    /// Take a trimmed, non-empty text field.
    fn text(&mut self, name: &'static str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_owned()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    /// Take a non-empty secret, preserving it byte for byte.
    fn secret(&mut self, name: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(self.missing))
        }
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Registration form (`POST /cadastrar`).
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    pub tipo: Option<String>,
}

/// A validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub role: Role,
}

impl RegisterForm {
    /// Check required fields, then the email shape, then the role.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a `ValidationError`.
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let mut required = Required::default();
        let name = required.text("nome", self.nome);
        let email = required.text("email", self.email);
        let password = required.secret("senha", self.senha);
        let role = required.text("tipo", self.tipo);
        required.finish()?;

        Ok(Registration {
            name,
            email: Email::parse(&email)?,
            password,
            role: role.parse()?,
        })
    }
}

// =============================================================================
// Login
// =============================================================================

/// Login form (`POST /login`). The `email` field also accepts a display name.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub senha: Option<String>,
}

/// A validated login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email address or display name.
    pub identifier: String,
    pub password: String,
}

impl LoginForm {
    /// Check that both fields are present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` if either field is blank.
    pub fn validate(self) -> Result<Credentials, ValidationError> {
        let mut required = Required::default();
        let identifier = required.text("email", self.email);
        let password = required.secret("senha", self.senha);
        required.finish()?;

        Ok(Credentials {
            identifier,
            password,
        })
    }
}

// =============================================================================
// Catalog entries
// =============================================================================

/// Publication year as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

/// Catalog entry body (`POST`/`PUT /api/exemplares`).
#[derive(Debug, Default, Deserialize)]
pub struct BookInput {
    pub titulo: Option<String>,
    pub autor: Option<String>,
    pub editora: Option<String>,
    pub ano_publicacao: Option<YearValue>,
    pub genero: Option<String>,
    pub sinopse: Option<String>,
    pub capa_url: Option<String>,
}

impl BookInput {
    /// Check that all seven fields are present and the year is an integer.
    ///
    /// A year of `0` or `""` counts as missing.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` listing every blank field, or
    /// `ValidationError::InvalidYear` if the year is not a valid integer.
    pub fn validate(self) -> Result<NewBook, ValidationError> {
        let mut required = Required::default();
        let title = required.text("titulo", self.titulo);
        let author = required.text("autor", self.autor);
        let publisher = required.text("editora", self.editora);
        let year = match self.ano_publicacao {
            Some(YearValue::Number(0)) | None => None,
            Some(YearValue::Text(ref s)) if s.trim().is_empty() => None,
            Some(value) => Some(value),
        };
        if year.is_none() {
            required.missing.push("ano_publicacao");
        }
        let genre = required.text("genero", self.genero);
        let synopsis = required.text("sinopse", self.sinopse);
        let cover_url = required.text("capa_url", self.capa_url);
        required.finish()?;

        let publication_year = match year {
            Some(value) => parse_year(value)?,
            None => return Err(ValidationError::MissingFields(vec!["ano_publicacao"])),
        };

        Ok(NewBook {
            title,
            author,
            publisher,
            publication_year,
            genre,
            synopsis,
            cover_url,
        })
    }
}

fn parse_year(value: YearValue) -> Result<i32, ValidationError> {
    match value {
        YearValue::Number(n) => {
            i32::try_from(n).map_err(|_| ValidationError::InvalidYear(n.to_string()))
        }
        YearValue::Text(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| ValidationError::InvalidYear(s)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            nome: some("Ana"),
            email: some("ana@x.com"),
            senha: some("pw"),
            tipo: some("usuario"),
        }
    }

    fn book_input() -> BookInput {
        BookInput {
            titulo: some("Dom Casmurro"),
            autor: some("Machado de Assis"),
            editora: some("Garnier"),
            ano_publicacao: Some(YearValue::Number(1899)),
            genero: some("Romance"),
            sinopse: some("Bentinho e Capitu."),
            capa_url: some("https://example.com/capa.jpg"),
        }
    }

    #[test]
    fn test_register_valid() {
        let registration = register_form().validate().unwrap();
        assert_eq!(registration.name, "Ana");
        assert_eq!(registration.email.as_str(), "ana@x.com");
        assert_eq!(registration.password, "pw");
        assert_eq!(registration.role, Role::Standard);
    }

    #[test]
    fn test_register_missing_fields_listed() {
        let form = RegisterForm {
            nome: some("   "),
            senha: some(""),
            ..register_form()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingFields(vec!["nome", "senha"]))
        );
        assert!(matches!(
            RegisterForm::default().validate(),
            Err(ValidationError::MissingFields(fields)) if fields.len() == 4
        ));
    }

    #[test]
    fn test_register_checks_email_before_role() {
        let form = RegisterForm {
            email: some("ana@x"),
            tipo: some("root"),
            ..register_form()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_register_rejects_unknown_role() {
        let form = RegisterForm {
            tipo: some("admin"),
            ..register_form()
        };
        assert!(matches!(form.validate(), Err(ValidationError::InvalidRole(_))));
    }

    #[test]
    fn test_register_keeps_password_spaces() {
        let form = RegisterForm {
            senha: some(" pass word "),
            ..register_form()
        };
        assert_eq!(form.validate().unwrap().password, " pass word ");
    }

    #[test]
    fn test_register_trims_text_fields() {
        let form = RegisterForm {
            nome: some("  Ana "),
            email: some(" ana@x.com "),
            ..register_form()
        };
        let registration = form.validate().unwrap();
        assert_eq!(registration.name, "Ana");
        assert_eq!(registration.email.as_str(), "ana@x.com");
    }

    #[test]
    fn test_login_requires_both_fields() {
        let form = LoginForm {
            email: some("Ana"),
            senha: None,
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingFields(vec!["senha"]))
        );

        let credentials = LoginForm {
            email: some(" Ana "),
            senha: some("pw"),
        }
        .validate()
        .unwrap();
        assert_eq!(credentials.identifier, "Ana");
    }

    #[test]
    fn test_book_valid() {
        let book = book_input().validate().unwrap();
        assert_eq!(book.title, "Dom Casmurro");
        assert_eq!(book.publication_year, 1899);
    }

    #[test]
    fn test_book_year_accepts_numeric_string() {
        let input: BookInput = serde_json::from_value(serde_json::json!({
            "titulo": "T", "autor": "A", "editora": "E", "ano_publicacao": "2001",
            "genero": "G", "sinopse": "S", "capa_url": "http://c"
        }))
        .unwrap();
        assert_eq!(input.validate().unwrap().publication_year, 2001);
    }

    #[test]
    fn test_book_all_fields_mandatory() {
        let input = BookInput {
            capa_url: None,
            ano_publicacao: Some(YearValue::Number(0)),
            ..book_input()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::MissingFields(vec![
                "ano_publicacao",
                "capa_url"
            ]))
        );

        let empty: BookInput = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            empty.validate(),
            Err(ValidationError::MissingFields(fields)) if fields.len() == 7
        ));
    }

    #[test]
    fn test_book_rejects_non_numeric_year() {
        let input = BookInput {
            ano_publicacao: Some(YearValue::Text("mil".to_string())),
            ..book_input()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidYear("mil".to_string()))
        );

        let input = BookInput {
            ano_publicacao: Some(YearValue::Number(i64::from(i32::MAX) + 1)),
            ..book_input()
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::InvalidYear(_))
        ));
    }

    fn request(content_type: &str, body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, content_type)
            .body(axum::body::Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_input_reads_json_and_forms() {
        let req = request(
            "application/json; charset=utf-8",
            r#"{"email":"Ana","senha":"pw"}"#,
        );
        let Input(form) = Input::<LoginForm>::from_request(req, &()).await.unwrap();
        assert_eq!(form.email.as_deref(), Some("Ana"));

        let req = request("application/x-www-form-urlencoded", "email=Ana&senha=pw");
        let Input(form) = Input::<LoginForm>::from_request(req, &()).await.unwrap();
        assert_eq!(form.senha.as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn test_input_rejections_keep_decoder() {
        let req = request("application/json", "{");
        assert!(matches!(
            Input::<LoginForm>::from_request(req, &()).await,
            Err(InputRejection::Json(_))
        ));

        let req = request("text/plain", "email=Ana");
        assert!(matches!(
            Input::<LoginForm>::from_request(req, &()).await,
            Err(InputRejection::Form(_))
        ));
    }
}
