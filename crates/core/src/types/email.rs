//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string was rejected as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email cannot contain whitespace")]
    Whitespace,
    #[error("email must contain exactly one @ symbol")]
    MissingAtSymbol,
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain has no dot with text on both sides.
    #[error("email domain must look like domain.tld")]
    InvalidDomain,
}

/// An address of the shape `local@domain.tld`.
///
/// ```
/// use bookshelf_core::Email;
///
/// assert!(Email::parse("ana@x.com").is_ok());
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
/// assert!(Email::parse("user@localhost").is_err());
/// assert!(Email::parse("a b@x.com").is_err());
/// ```
///
/// Values read back from `usuarios.email` are trusted and not re-checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Check the shape of `s` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] rule that `s` breaks.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        match s {
            "" => return Err(EmailError::Empty),
            _ if s.len() > Self::MAX_LENGTH => {
                return Err(EmailError::TooLong {
                    max: Self::MAX_LENGTH,
                });
            }
            _ if s.contains(char::is_whitespace) => return Err(EmailError::Whitespace),
            _ => {}
        }

        let Some((local, domain)) = s.split_once('@') else {
            return Err(EmailError::MissingAtSymbol);
        };
        if domain.contains('@') {
            return Err(EmailError::MissingAtSymbol);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }

        // "a.b" and "a.b." pass; ".com", "com." and "localhost" do not.
        let dotted = domain
            .match_indices('.')
            .any(|(i, _)| i > 0 && i + 1 < domain.len());
        if !dotted {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("ana@x.com").is_ok());
        assert!(Email::parse("user.name@example.com").is_ok());
        assert!(Email::parse("user+tag@example.com").is_ok());
        assert!(Email::parse("user@subdomain.example.com").is_ok());
        assert!(Email::parse("a@b.c").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(Email::parse("ana @x.com"), Err(EmailError::Whitespace));
        assert_eq!(Email::parse("ana@x.com "), Err(EmailError::Whitespace));
    }

    #[test]
    fn test_parse_at_symbols() {
        assert_eq!(
            Email::parse("no-at-symbol"),
            Err(EmailError::MissingAtSymbol)
        );
        assert_eq!(
            Email::parse("a@b@c.com"),
            Err(EmailError::MissingAtSymbol)
        );
        assert_eq!(Email::parse("@domain.com"), Err(EmailError::EmptyLocalPart));
    }

    #[test]
    fn test_parse_domain_needs_interior_dot() {
        assert_eq!(Email::parse("user@"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@localhost"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@.com"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@com."), Err(EmailError::InvalidDomain));
        assert!(Email::parse("user@a.b.").is_ok());
    }

    #[test]
    fn test_parse_non_ascii_domains() {
        assert!(Email::parse("ana@ético.com.br").is_ok());
        assert!(Email::parse("ana@x.comé").is_ok());
        assert!(Email::parse("ana@é.ç").is_ok());
        assert_eq!(Email::parse("ana@ético"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("ana@.é"), Err(EmailError::InvalidDomain));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("user@example.com").unwrap();
        assert_eq!(serde_json::to_value(&email).unwrap(), "user@example.com");
    }
}
