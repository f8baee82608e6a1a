//! Cart service.
//!
//! Each operation is one transaction: lock the user's cart row, apply the
//! `CartItems` rules against the product's live stock, write the lines back.

use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use bazaar_core::{CartId, CartItems, ProductId, ReconcileError, UserId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::CartView;

/// Message for ids or quantities that fail basic validation.
pub const INVALID_DATA: &str = "Invalid data provided";

pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add `quantity` units of a product, creating the cart on first use.
    ///
    /// # Errors
    ///
    /// - `AppError::BadRequest` for non-positive ids or quantity
    /// - `AppError::NotFound` if the product doesn't exist
    /// - `ReconcileError::StockExceeded` if the summed quantity exceeds stock
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartView> {
        validate_ids(user_id, product_id)?;
        if quantity <= 0 {
            return Err(AppError::BadRequest(INVALID_DATA.to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let stock = live_stock(&mut tx, product_id).await?;
        let cart_id = CartRepository::lock_or_create(&mut tx, user_id).await?;
        let mut items = CartRepository::load_items(&mut *tx, cart_id).await?;

        let new_quantity = items.add(product_id, quantity, stock)?;
        CartRepository::save_items(&mut tx, cart_id, &items).await?;

        let view = render(&mut tx, cart_id, user_id, &items).await?;
        tx.commit().await?;

        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[
                ("product_id", &product_id.to_string()),
                ("quantity", &new_quantity.to_string()),
            ]),
        );
        tracing::info!(quantity = new_quantity, "cart line updated");
        Ok(view)
    }

    /// The user's cart, or an empty view if they never added anything.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if a query fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn fetch(&self, user_id: UserId) -> Result<CartView> {
        if !user_id.is_valid() {
            return Err(AppError::BadRequest("User id is mandatory".to_string()));
        }

        let Some(cart_id) = CartRepository::new(self.pool).find_id(user_id).await? else {
            return Ok(CartView::empty(user_id));
        };

        let items = CartRepository::load_items(self.pool, cart_id).await?;
        let products = ProductRepository::summaries(
            self.pool,
            items.lines().iter().map(|line| line.product_id),
        )
        .await?;

        Ok(CartView::build(cart_id, user_id, &items, &products))
    }

    /// Overwrite the quantity of a line already in the cart.
    ///
    /// # Errors
    ///
    /// - `AppError::BadRequest` for non-positive ids or quantity
    /// - `AppError::NotFound` for a missing product, cart, or line
    /// - `ReconcileError::StockExceeded` if the quantity exceeds stock
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartView> {
        validate_ids(user_id, product_id)?;
        if quantity <= 0 {
            return Err(AppError::BadRequest(INVALID_DATA.to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let stock = live_stock(&mut tx, product_id).await?;
        let cart_id = CartRepository::lock(&mut tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;
        let mut items = CartRepository::load_items(&mut *tx, cart_id).await?;

        items
            .set_quantity(product_id, quantity, stock)
            .map_err(|e| match e {
                ReconcileError::ItemNotFound => {
                    AppError::NotFound("Item not found in cart".to_string())
                }
                other => other.into(),
            })?;
        CartRepository::save_items(&mut tx, cart_id, &items).await?;

        let view = render(&mut tx, cart_id, user_id, &items).await?;
        tx.commit().await?;
        Ok(view)
    }

    /// Drop a product's line. Removing an absent line leaves the cart as is.
    ///
    /// # Errors
    ///
    /// - `AppError::BadRequest` for non-positive ids
    /// - `AppError::NotFound` if the user has no cart
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn remove_item(&self, user_id: UserId, product_id: ProductId) -> Result<CartView> {
        validate_ids(user_id, product_id)?;

        let mut tx = self.pool.begin().await?;

        let cart_id = CartRepository::lock(&mut tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;
        let mut items = CartRepository::load_items(&mut *tx, cart_id).await?;

        if items.remove(product_id) {
            CartRepository::save_items(&mut tx, cart_id, &items).await?;
        }

        let view = render(&mut tx, cart_id, user_id, &items).await?;
        tx.commit().await?;
        Ok(view)
    }
}

fn validate_ids(user_id: UserId, product_id: ProductId) -> Result<()> {
    if user_id.is_valid() && product_id.is_valid() {
        Ok(())
    } else {
        Err(AppError::BadRequest(INVALID_DATA.to_string()))
    }
}

async fn live_stock(conn: &mut PgConnection, product_id: ProductId) -> Result<i32> {
    ProductRepository::stock_for_share(conn, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

async fn render(
    conn: &mut PgConnection,
    cart_id: CartId,
    user_id: UserId,
    items: &CartItems,
) -> Result<CartView> {
    let products =
        ProductRepository::summaries(conn, items.lines().iter().map(|line| line.product_id))
            .await?;
    Ok(CartView::build(cart_id, user_id, items, &products))
}
