//! Product catalog service.
//!
//! Admin product management plus the public shop listing.

use sqlx::PgPool;
use tracing::instrument;

use bazaar_core::ProductId;

use crate::cloudinary::{CloudinaryClient, MAX_UPLOAD_BYTES, UploadedImage};
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::{
    NewProductRequest, Product, ProductFilter, ProductInputError, ProductPatchRequest,
};

pub struct ProductService<'a> {
    pool: &'a PgPool,
    products: ProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            products: ProductRepository::new(pool),
        }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if a field fails validation.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(&self, request: NewProductRequest) -> Result<Product> {
        let draft = request.into_draft().map_err(invalid_input)?;
        let product = self.products.create(&draft).await?;

        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Every product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>> {
        Ok(self.products.list_all().await?)
    }

    /// Apply a partial edit to a product.
    ///
    /// # Errors
    ///
    /// - `AppError::NotFound` if the product doesn't exist
    /// - `AppError::BadRequest` if an edited field fails validation
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn edit(&self, id: ProductId, patch: &ProductPatchRequest) -> Result<Product> {
        let mut tx = self.pool.begin().await?;

        let current = ProductRepository::get_for_update(&mut tx, id)
            .await?
            .ok_or_else(product_not_found)?;
        let draft = patch.apply(&current.draft()).map_err(invalid_input)?;

        let product = ProductRepository::update(&mut tx, id, &draft)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => product_not_found(),
                other => other.into(),
            })?;
        tx.commit().await?;

        tracing::info!("product updated");
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product doesn't exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<()> {
        if !self.products.delete(id).await? {
            return Err(product_not_found());
        }
        tracing::info!("product deleted");
        Ok(())
    }

    /// Shop listing filtered by category and brand.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_filtered(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        Ok(self.products.list_filtered(filter).await?)
    }

    /// One product for the shop detail page.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product doesn't exist.
    pub async fn details(&self, id: ProductId) -> Result<Product> {
        self.products.get(id).await?.ok_or_else(product_not_found)
    }
}

/// Check an uploaded file and push it to the image host.
///
/// # Errors
///
/// - `AppError::BadRequest` for an empty file, a non-image content type, or
///   a file over [`MAX_UPLOAD_BYTES`]
/// - `AppError::ImageHost` if the upload fails
#[instrument(skip(client, bytes), fields(size = bytes.len()))]
pub async fn upload_image(
    client: &CloudinaryClient,
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<UploadedImage> {
    let content_type = validate_upload(bytes, content_type)?;
    Ok(client.upload_image(bytes, content_type).await?)
}

fn validate_upload<'c>(bytes: &[u8], content_type: Option<&'c str>) -> Result<&'c str> {
    let content_type = content_type
        .filter(|ct| ct.starts_with("image/"))
        .ok_or_else(|| AppError::BadRequest("Only image uploads are allowed".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest("File is too large (max 5 MB)".to_string()));
    }
    Ok(content_type)
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn invalid_input(err: ProductInputError) -> AppError {
    AppError::BadRequest(err.to_string())
}
