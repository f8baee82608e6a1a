//! Product repository.

use std::collections::HashMap;

use sqlx::{PgConnection, PgExecutor, PgPool, Postgres, QueryBuilder};

use bazaar_core::ProductId;

use super::RepositoryError;
use crate::models::product::{Product, ProductDraft, ProductFilter, ProductSummary};

const PRODUCT_COLUMNS: &str = "id, image, title, description, category, brand, price, \
     sale_price, total_stock, average_review, created_at, updated_at";

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO shop.product
                (image, title, description, category, brand, price, sale_price,
                 total_stock, average_review)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&draft.image)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(&draft.brand)
        .bind(draft.price)
        .bind(draft.sale_price)
        .bind(draft.total_stock)
        .bind(draft.average_review)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Products matching the shop filter, in the requested order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_filtered(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut query: QueryBuilder<'static, Postgres> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE TRUE"
        ));

        if !filter.categories.is_empty() {
            query
                .push(" AND category = ANY(")
                .push_bind(filter.categories.clone())
                .push(")");
        }
        if !filter.brands.is_empty() {
            query
                .push(" AND brand = ANY(")
                .push_bind(filter.brands.clone())
                .push(")");
        }
        query.push(" ORDER BY ").push(filter.sort.order_by());

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Lock a product for editing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_update(
        conn: &mut PgConnection,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }

    /// Overwrite a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        conn: &mut PgConnection,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE shop.product
            SET image = $2, title = $3, description = $4, category = $5, brand = $6,
                price = $7, sale_price = $8, total_stock = $9, average_review = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.image)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(&draft.brand)
        .bind(draft.price)
        .bind(draft.sale_price)
        .bind(draft.total_stock)
        .bind(draft.average_review)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// Cart and wishlist lines that reference it are left alone and render
    /// as placeholders.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Current stock of a product, holding a share lock until the
    /// transaction ends so an admin edit cannot slip in between check and write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stock_for_share(
        conn: &mut PgConnection,
        id: ProductId,
    ) -> Result<Option<i32>, RepositoryError> {
        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT total_stock FROM shop.product WHERE id = $1 FOR SHARE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(stock)
    }

    /// Summaries for the given products, keyed by ID. Missing IDs are absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summaries<'e>(
        executor: impl PgExecutor<'e>,
        ids: impl IntoIterator<Item = ProductId>,
    ) -> Result<HashMap<ProductId, ProductSummary>, RepositoryError> {
        let ids: Vec<i32> = ids.into_iter().map(|id| id.as_i32()).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ProductSummary>(
            r"
            SELECT id, image, title, price, sale_price, total_stock
            FROM shop.product
            WHERE id = ANY($1)
            ",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(|p| (p.id, p)).collect())
    }
}
