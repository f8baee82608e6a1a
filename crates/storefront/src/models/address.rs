//! Shipping addresses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{AddressFields, AddressId, UserId};

/// An address row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AddressRow {
    pub id: AddressId,
    pub user_id: UserId,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub pincode: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored address as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: AddressId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub fields: AddressFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            fields: AddressFields {
                address: row.address,
                city: row.city,
                phone: row.phone,
                pincode: row.pincode,
                notes: row.notes,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
