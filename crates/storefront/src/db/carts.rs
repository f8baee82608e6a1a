//! Cart repository.
//!
//! A cart row is the lock for its lines: every write path locks it with
//! `FOR UPDATE` before reading `cart_item`, so concurrent requests for the
//! same user run one after another.

use sqlx::{PgConnection, PgExecutor, PgPool};

use bazaar_core::{CartId, CartItems, CartLine, ProductId, UserId};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct CartLineRow {
    product_id: ProductId,
    quantity: i32,
}

/// Repository for carts and their line items.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The user's cart ID, if they have one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_id(&self, user_id: UserId) -> Result<Option<CartId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CartId>("SELECT id FROM shop.cart WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(id)
    }

    /// Lock the user's cart, creating it first if missing.
    ///
    /// The insert only runs when no cart exists, so steady-state writes
    /// don't consume `SERIAL` values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn lock_or_create(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> Result<CartId, RepositoryError> {
        if let Some(id) = Self::lock(conn, user_id).await? {
            return Ok(id);
        }

        sqlx::query(
            "INSERT INTO shop.cart (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        Self::lock(conn, user_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("cart for user {user_id} vanished"))
        })
    }

    /// Lock the user's existing cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> Result<Option<CartId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CartId>(
            "SELECT id FROM shop.cart WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(id)
    }

    /// Load a cart's lines in the order they were first added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load_items<'e>(
        executor: impl PgExecutor<'e>,
        cart_id: CartId,
    ) -> Result<CartItems, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT product_id, quantity
            FROM shop.cart_item
            WHERE cart_id = $1
            ORDER BY position
            ",
        )
        .bind(cart_id)
        .fetch_all(executor)
        .await?;

        Ok(CartItems::from_lines(rows.into_iter().map(|r| CartLine {
            product_id: r.product_id,
            quantity: r.quantity,
        })))
    }

    /// Replace a cart's lines with `items`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn save_items(
        conn: &mut PgConnection,
        cart_id: CartId,
        items: &CartItems,
    ) -> Result<(), RepositoryError> {
        let (product_ids, quantities): (Vec<i32>, Vec<i32>) = items
            .lines()
            .iter()
            .map(|line| (line.product_id.as_i32(), line.quantity))
            .unzip();

        sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            r"
            INSERT INTO shop.cart_item (cart_id, product_id, quantity, position)
            SELECT $1, t.product_id, t.quantity, t.position::INT4
            FROM UNNEST($2::INT4[], $3::INT4[]) WITH ORDINALITY
                AS t(product_id, quantity, position)
            ",
        )
        .bind(cart_id)
        .bind(product_ids)
        .bind(quantities)
        .execute(&mut *conn)
        .await?;

        sqlx::query("UPDATE shop.cart SET updated_at = NOW() WHERE id = $1")
            .bind(cart_id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
