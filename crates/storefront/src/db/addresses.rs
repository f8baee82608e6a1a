//! Address repository.

use sqlx::{PgConnection, PgPool};

use bazaar_core::{AddressFields, AddressId, UserId};

use super::RepositoryError;
use crate::models::address::{Address, AddressRow};

const ADDRESS_COLUMNS: &str =
    "id, user_id, address, city, phone, pincode, notes, created_at, updated_at";

/// Repository for user addresses.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All of a user's addresses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM shop.address WHERE user_id = $1 ORDER BY created_at, id"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    /// Lock the owning user row. Returns `false` if the user doesn't exist.
    ///
    /// Serializes address-book writes per user so the capacity check and the
    /// insert see the same count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_owner(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let found = sqlx::query_scalar::<_, UserId>(
            "SELECT id FROM shop.user WHERE id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(found.is_some())
    }

    /// Number of addresses the user holds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(conn: &mut PgConnection, user_id: UserId) -> Result<usize, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shop.address WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(conn)
        .await?;

        usize::try_from(count)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative count {count}")))
    }

    /// Insert a new address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: UserId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            INSERT INTO shop.address (user_id, address, city, phone, pincode, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.phone)
        .bind(&fields.pincode)
        .bind(&fields.notes)
        .fetch_one(conn)
        .await?;

        Ok(row.into())
    }

    /// Lock one of the user's addresses for editing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_update(
        conn: &mut PgConnection,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM shop.address WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Overwrite an address's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        conn: &mut PgConnection,
        address_id: AddressId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            UPDATE shop.address
            SET address = $2, city = $3, phone = $4, pincode = $5, notes = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(address_id)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.phone)
        .bind(&fields.pincode)
        .bind(&fields.notes)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete one of the user's addresses.
    ///
    /// # Returns
    ///
    /// Returns `true` if the address was deleted, `false` if the user has no
    /// such address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.address WHERE id = $1 AND user_id = $2")
            .bind(address_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
