//! Feature image repository.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::FeatureImage;

const FEATURE_COLUMNS: &str = "id, image, created_at, updated_at";

pub struct FeatureImageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FeatureImageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new feature image URL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, image: &str) -> Result<FeatureImage, RepositoryError> {
        let feature = sqlx::query_as::<_, FeatureImage>(&format!(
            "INSERT INTO shop.feature_image (image) VALUES ($1) RETURNING {FEATURE_COLUMNS}"
        ))
        .bind(image)
        .fetch_one(self.pool)
        .await?;

        Ok(feature)
    }

    /// Every feature image, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<FeatureImage>, RepositoryError> {
        let features = sqlx::query_as::<_, FeatureImage>(&format!(
            "SELECT {FEATURE_COLUMNS} FROM shop.feature_image ORDER BY created_at, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(features)
    }
}
