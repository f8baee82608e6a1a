//! Address book service.

use sqlx::PgPool;
use tracing::instrument;

use bazaar_core::reconcile::address::check_capacity;
use bazaar_core::{AddressFields, AddressId, AddressPatch, UserId};

use crate::db::AddressRepository;
use crate::error::{AppError, Result};
use crate::models::Address;

pub struct AddressService<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new address.
    ///
    /// The user row stays locked between the capacity check and the insert,
    /// so two concurrent adds cannot both slip under the limit.
    ///
    /// # Errors
    ///
    /// - `AppError::NotFound` if the user doesn't exist
    /// - `ReconcileError::CapacityExceeded` if the book is full
    #[instrument(skip(self, fields), fields(user_id = %user_id))]
    pub async fn add(&self, user_id: UserId, fields: &AddressFields) -> Result<Address> {
        let mut tx = self.pool.begin().await?;

        if !AddressRepository::lock_owner(&mut tx, user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        check_capacity(AddressRepository::count(&mut tx, user_id).await?)?;

        let address = AddressRepository::insert(&mut tx, user_id, fields).await?;
        tx.commit().await?;

        tracing::info!(address_id = %address.id, "address added");
        Ok(address)
    }

    /// All of the user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>> {
        Ok(AddressRepository::new(self.pool).list(user_id).await?)
    }

    /// Apply a partial edit. Blank or absent fields keep their value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the user has no such address.
    #[instrument(skip(self, patch), fields(user_id = %user_id, address_id = %address_id))]
    pub async fn edit(
        &self,
        user_id: UserId,
        address_id: AddressId,
        patch: &AddressPatch,
    ) -> Result<Address> {
        let mut tx = self.pool.begin().await?;

        let current = AddressRepository::get_for_update(&mut tx, user_id, address_id)
            .await?
            .ok_or_else(address_not_found)?;

        let edited = patch.apply(&current.fields);
        let address = AddressRepository::update(&mut tx, address_id, &edited).await?;
        tx.commit().await?;
        Ok(address)
    }

    /// Delete one of the user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the user has no such address.
    #[instrument(skip(self), fields(user_id = %user_id, address_id = %address_id))]
    pub async fn delete(&self, user_id: UserId, address_id: AddressId) -> Result<()> {
        if AddressRepository::new(self.pool)
            .delete(user_id, address_id)
            .await?
        {
            Ok(())
        } else {
            Err(address_not_found())
        }
    }
}

fn address_not_found() -> AppError {
    AppError::NotFound("Address not found".to_string())
}
