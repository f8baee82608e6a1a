//! Partial-update helpers shared by address and product edits.

use serde::Deserialize;

use crate::{Price, PriceError};

/// Merge a submitted text field into the stored value.
///
/// Absent or blank submissions keep `current`; anything else replaces it
/// (trimmed).
#[must_use]
pub fn merge_text(current: &str, submitted: Option<&str>) -> String {
    match submitted.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => current.to_owned(),
    }
}

/// A price field in an edit request.
///
/// Admin forms send either a number or a string; a cleared input arrives as
/// `""` and means zero.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PricePatch {
    Amount(Price),
    Text(String),
}

impl PricePatch {
    /// Resolve the submitted price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if a text value is neither blank nor a valid
    /// non-negative number.
    pub fn resolve(&self) -> Result<Price, PriceError> {
        match self {
            Self::Amount(price) => Ok(*price),
            Self::Text(text) => Price::parse(text),
        }
    }

    /// Apply an optional patch to the stored price.
    ///
    /// # Errors
    ///
    /// See [`PricePatch::resolve`].
    pub fn apply(patch: Option<&Self>, current: Price) -> Result<Price, PriceError> {
        patch.map_or(Ok(current), Self::resolve)
    }
}
