//! Account roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known role.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// Permission tier of an account.
///
/// Stored in `usuarios.tipo` and carried in session claims using the
/// wire names `usuario` and `administrador`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May read the catalog.
    #[serde(rename = "usuario")]
    Standard,
    /// May read and mutate the catalog. At most one account holds this role.
    #[serde(rename = "administrador")]
    Administrator,
}

impl Role {
    /// Wire and storage name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "usuario",
            Self::Administrator => "administrador",
        }
    }

    /// Whether this role may mutate the catalog.
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usuario" => Ok(Self::Standard),
            "administrador" => Ok(Self::Administrator),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!("usuario".parse::<Role>().unwrap(), Role::Standard);
        assert_eq!("administrador".parse::<Role>().unwrap(), Role::Administrator);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "admin".parse::<Role>(),
            Err(RoleError("admin".to_string()))
        );
        assert!("Administrador".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_wire_names_match_display() {
        for role in [Role::Standard, Role::Administrator] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
    }

    #[test]
    fn test_only_administrator_is_administrator() {
        assert!(Role::Administrator.is_administrator());
        assert!(!Role::Standard.is_administrator());
    }
}
