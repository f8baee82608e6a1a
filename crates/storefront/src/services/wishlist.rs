//! Wishlist service.
//!
//! Wishlists belong either to a registered user or to a guest token. A guest's
//! wishlist is folded into the user's on login via [`WishlistService::merge`].

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use bazaar_core::{ProductId, UserId, WishlistId, WishlistItems, WishlistOwner};

use crate::db::{ProductRepository, WishlistRepository};
use crate::error::{AppError, Result};
use crate::models::WishlistView;

pub struct WishlistService<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns the wishlist and whether the product is now on it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a non-positive product id.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn toggle(
        &self,
        owner: &WishlistOwner,
        product_id: ProductId,
    ) -> Result<(WishlistView, bool)> {
        if !product_id.is_valid() {
            return Err(AppError::BadRequest("Invalid product id".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let wishlist_id = WishlistRepository::lock_or_create(&mut tx, owner).await?;
        let mut items = WishlistRepository::load_entries(&mut *tx, wishlist_id).await?;

        let wishlisted = items.toggle(product_id, Utc::now());
        WishlistRepository::save_entries(&mut tx, wishlist_id, &items).await?;

        let view = render(&mut tx, wishlist_id, owner, &items).await?;
        tx.commit().await?;

        tracing::info!(wishlisted, "wishlist toggled");
        Ok((view, wishlisted))
    }

    /// The owner's wishlist, or an empty view if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn fetch(&self, owner: &WishlistOwner) -> Result<WishlistView> {
        let Some(wishlist_id) = WishlistRepository::new(self.pool).find_id(owner).await? else {
            return Ok(WishlistView::empty());
        };

        let items = WishlistRepository::load_entries(self.pool, wishlist_id).await?;
        let products = ProductRepository::summaries(
            self.pool,
            items.entries().iter().map(|e| e.product_id),
        )
        .await?;

        Ok(WishlistView::build(wishlist_id, owner, &items, &products))
    }

    /// Union a guest's products into the user's wishlist.
    ///
    /// Products already wished for are skipped; invalid ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if a query fails.
    #[instrument(skip(self, product_ids), fields(user_id = %user_id))]
    pub async fn merge(
        &self,
        user_id: UserId,
        product_ids: impl IntoIterator<Item = ProductId> + Send,
    ) -> Result<WishlistView> {
        let owner = WishlistOwner::User(user_id);
        let mut tx = self.pool.begin().await?;

        let wishlist_id = WishlistRepository::lock_or_create(&mut tx, &owner).await?;
        let mut items = WishlistRepository::load_entries(&mut *tx, wishlist_id).await?;

        let added = items.merge(
            product_ids.into_iter().filter(ProductId::is_valid),
            Utc::now(),
        );
        if added > 0 {
            WishlistRepository::save_entries(&mut tx, wishlist_id, &items).await?;
        }

        let view = render(&mut tx, wishlist_id, &owner, &items).await?;
        tx.commit().await?;

        tracing::info!(added, "guest wishlist merged");
        Ok(view)
    }

    /// Drop a product from the user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the user has no wishlist.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<WishlistView> {
        let owner = WishlistOwner::User(user_id);
        let mut tx = self.pool.begin().await?;

        let wishlist_id = WishlistRepository::lock(&mut tx, &owner)
            .await?
            .ok_or_else(|| AppError::NotFound("Wishlist not found".to_string()))?;
        let mut items = WishlistRepository::load_entries(&mut *tx, wishlist_id).await?;

        if items.remove(product_id) {
            WishlistRepository::save_entries(&mut tx, wishlist_id, &items).await?;
        }

        let view = render(&mut tx, wishlist_id, &owner, &items).await?;
        tx.commit().await?;
        Ok(view)
    }
}

async fn render(
    conn: &mut PgConnection,
    wishlist_id: WishlistId,
    owner: &WishlistOwner,
    items: &WishlistItems,
) -> Result<WishlistView> {
    let products =
        ProductRepository::summaries(conn, items.entries().iter().map(|e| e.product_id)).await?;
    Ok(WishlistView::build(wishlist_id, owner, items, &products))
}
