//! Display user name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UserName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// The input is empty after trimming.
    #[error("user name cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("user name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace or control characters.
    #[error("user name cannot contain whitespace")]
    InvalidCharacter,
}

/// A unique, lowercase user name.
///
/// Leading and trailing whitespace is trimmed and the result is lowercased,
/// matching how names are stored and compared for uniqueness.
///
/// ```
/// use bazaar_core::UserName;
///
/// assert_eq!(UserName::parse(" JaneDoe ").unwrap().as_str(), "janedoe");
/// assert!(UserName::parse("jane doe").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 64;

    /// Parse and normalize a user name.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`] characters, or contains inner whitespace.
    pub fn parse(s: &str) -> Result<Self, UserNameError> {
        let s = s.trim().to_lowercase();

        if s.is_empty() {
            return Err(UserNameError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(UserNameError::InvalidCharacter);
        }

        Ok(Self(s))
    }

    /// Returns the user name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UserName {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UserName {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UserName {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases() {
        assert_eq!(
            UserName::parse("MixedCase").map(|n| n.to_string()),
            Ok("mixedcase".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(UserName::parse("  \t "), Err(UserNameError::Empty));
    }

    #[test]
    fn test_parse_rejects_inner_space() {
        assert_eq!(
            UserName::parse("two words"),
            Err(UserNameError::InvalidCharacter)
        );
    }

    #[test]
    fn test_parse_too_long() {
        let long = "x".repeat(UserName::MAX_LENGTH + 1);
        assert!(matches!(
            UserName::parse(&long),
            Err(UserNameError::TooLong { .. })
        ));
    }
}
