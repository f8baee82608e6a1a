//! Guest session identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`GuestId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GuestIdError {
    #[error("guest id cannot be empty")]
    Empty,
    #[error("guest id must be at most {max} characters")]
    TooLong { max: usize },
    #[error("guest id may only contain letters, digits, '-' and '_'")]
    InvalidCharacter,
}

/// Client-generated token that owns a wishlist before the shopper logs in.
///
/// The client mints this (typically a UUID) and keeps it in local storage.
/// The server only checks that it is a short, URL-safe string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct GuestId(String);

impl GuestId {
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a guest identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, or contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, GuestIdError> {
        if s.is_empty() {
            return Err(GuestIdError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(GuestIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(GuestIdError::InvalidCharacter);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GuestId {
    type Error = GuestIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GuestId> for String {
    fn from(id: GuestId) -> Self {
        id.0
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
