//! Address book rules.

use serde::{Deserialize, Serialize};

use super::ReconcileError;
use super::patch::merge_text;

/// Maximum number of addresses a user may keep.
pub const MAX_ADDRESSES: usize = 3;

/// Check that one more address fits next to `existing` ones.
///
/// # Errors
///
/// Returns `ReconcileError::CapacityExceeded` when the book is full.
pub const fn check_capacity(existing: usize) -> Result<(), ReconcileError> {
    if existing >= MAX_ADDRESSES {
        return Err(ReconcileError::CapacityExceeded { max: MAX_ADDRESSES });
    }
    Ok(())
}

/// The free-text fields of an address, all required and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub address: String,
    pub city: String,
    pub phone: String,
    pub pincode: String,
    pub notes: String,
}

impl AddressFields {
    /// Validate and trim a new address.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::MissingField` naming the first blank field.
    pub fn new(
        address: &str,
        city: &str,
        phone: &str,
        pincode: &str,
        notes: &str,
    ) -> Result<Self, ReconcileError> {
        Ok(Self {
            address: required("address", address)?,
            city: required("city", city)?,
            phone: required("phone", phone)?,
            pincode: required("pincode", pincode)?,
            notes: required("notes", notes)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ReconcileError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ReconcileError::MissingField { field });
    }
    Ok(value.to_owned())
}

/// A partial address edit. Absent or blank fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddressPatch {
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub pincode: Option<String>,
    pub notes: Option<String>,
}

impl AddressPatch {
    /// Produce the edited address.
    #[must_use]
    pub fn apply(&self, current: &AddressFields) -> AddressFields {
        AddressFields {
            address: merge_text(&current.address, self.address.as_deref()),
            city: merge_text(&current.city, self.city.as_deref()),
            phone: merge_text(&current.phone, self.phone.as_deref()),
            pincode: merge_text(&current.pincode, self.pincode.as_deref()),
            notes: merge_text(&current.notes, self.notes.as_deref()),
        }
    }
}
