//! Wishlist repository.
//!
//! A wishlist belongs to exactly one of a user or a guest identifier. Like
//! carts, the wishlist row is locked before its items are read on any write.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor, PgPool};

use bazaar_core::{ProductId, WishlistEntry, WishlistId, WishlistItems, WishlistOwner};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct WishlistEntryRow {
    product_id: ProductId,
    added_at: DateTime<Utc>,
}

/// Column that identifies this kind of owner.
fn owner_column(owner: &WishlistOwner) -> &'static str {
    match owner {
        WishlistOwner::User(_) => "user_id",
        WishlistOwner::Guest(_) => "guest_id",
    }
}

fn bind_owner<'q>(
    query: sqlx::query::QueryScalar<'q, sqlx::Postgres, WishlistId, sqlx::postgres::PgArguments>,
    owner: &'q WishlistOwner,
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, WishlistId, sqlx::postgres::PgArguments> {
    match owner {
        WishlistOwner::User(id) => query.bind(*id),
        WishlistOwner::Guest(guest) => query.bind(guest.as_str()),
    }
}

/// Repository for wishlists and their items.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The owner's wishlist ID, if they have one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_id(
        &self,
        owner: &WishlistOwner,
    ) -> Result<Option<WishlistId>, RepositoryError> {
        let sql = format!(
            "SELECT id FROM shop.wishlist WHERE {} = $1",
            owner_column(owner)
        );
        let id = bind_owner(sqlx::query_scalar(&sql), owner)
            .fetch_optional(self.pool)
            .await?;

        Ok(id)
    }

    /// Lock the owner's wishlist, creating it first if missing.
    ///
    /// A freshly inserted row is already held by this transaction. When a
    /// concurrent request wins the insert, its row is locked instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn lock_or_create(
        conn: &mut PgConnection,
        owner: &WishlistOwner,
    ) -> Result<WishlistId, RepositoryError> {
        if let Some(id) = Self::lock(conn, owner).await? {
            return Ok(id);
        }

        let column = owner_column(owner);
        let sql = format!(
            "INSERT INTO shop.wishlist ({column}) VALUES ($1) \
             ON CONFLICT ({column}) DO NOTHING RETURNING id"
        );
        let inserted = bind_owner(sqlx::query_scalar(&sql), owner)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(id) = inserted {
            return Ok(id);
        }

        Self::lock(conn, owner).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("wishlist for {column} vanished"))
        })
    }

    /// Lock the owner's existing wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock(
        conn: &mut PgConnection,
        owner: &WishlistOwner,
    ) -> Result<Option<WishlistId>, RepositoryError> {
        let sql = format!(
            "SELECT id FROM shop.wishlist WHERE {} = $1 FOR UPDATE",
            owner_column(owner)
        );
        let id = bind_owner(sqlx::query_scalar(&sql), owner)
            .fetch_optional(conn)
            .await?;

        Ok(id)
    }

    /// Load a wishlist's entries in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load_entries<'e>(
        executor: impl PgExecutor<'e>,
        wishlist_id: WishlistId,
    ) -> Result<WishlistItems, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistEntryRow>(
            r"
            SELECT product_id, added_at
            FROM shop.wishlist_item
            WHERE wishlist_id = $1
            ORDER BY position
            ",
        )
        .bind(wishlist_id)
        .fetch_all(executor)
        .await?;

        Ok(WishlistItems::from_entries(rows.into_iter().map(|r| {
            WishlistEntry {
                product_id: r.product_id,
                added_at: r.added_at,
            }
        })))
    }

    /// Replace a wishlist's entries with `items`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn save_entries(
        conn: &mut PgConnection,
        wishlist_id: WishlistId,
        items: &WishlistItems,
    ) -> Result<(), RepositoryError> {
        let (product_ids, added_at): (Vec<i32>, Vec<DateTime<Utc>>) = items
            .entries()
            .iter()
            .map(|e| (e.product_id.as_i32(), e.added_at))
            .unzip();

        sqlx::query("DELETE FROM shop.wishlist_item WHERE wishlist_id = $1")
            .bind(wishlist_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            r"
            INSERT INTO shop.wishlist_item (wishlist_id, product_id, added_at, position)
            SELECT $1, t.product_id, t.added_at, t.position::INT4
            FROM UNNEST($2::INT4[], $3::TIMESTAMPTZ[]) WITH ORDINALITY
                AS t(product_id, added_at, position)
            ",
        )
        .bind(wishlist_id)
        .bind(product_ids)
        .bind(added_at)
        .execute(&mut *conn)
        .await?;

        sqlx::query("UPDATE shop.wishlist SET updated_at = NOW() WHERE id = $1")
            .bind(wishlist_id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
