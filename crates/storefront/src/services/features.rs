//! Feature image service.
//!
//! Admins register banner images already uploaded through the product image
//! route; the shop home page reads them back.

use sqlx::PgPool;
use tracing::instrument;
use url::Url;

use crate::db::FeatureImageRepository;
use crate::error::{AppError, Result};
use crate::models::FeatureImage;

pub struct FeatureService<'a> {
    features: FeatureImageRepository<'a>,
}

impl<'a> FeatureService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            features: FeatureImageRepository::new(pool),
        }
    }

    /// Add a feature image.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` unless `image` is an http(s) URL.
    #[instrument(skip(self))]
    pub async fn add(&self, image: &str) -> Result<FeatureImage> {
        let image = validate_image_url(image)?;
        let feature = self.features.create(image.as_str()).await?;

        tracing::info!(feature_id = %feature.id, "feature image added");
        Ok(feature)
    }

    /// All feature images in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<FeatureImage>> {
        Ok(self.features.list().await?)
    }
}

fn validate_image_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest("Image is required".to_string()));
    }

    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(AppError::BadRequest("Image must be an http(s) URL".to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_must_be_http() {
        let url =
            validate_image_url(" https://res.cloudinary.com/demo/image/upload/banner.jpg ").unwrap();
        assert_eq!(url.host_str(), Some("res.cloudinary.com"));

        assert!(matches!(
            validate_image_url("   "),
            Err(AppError::BadRequest(msg)) if msg == "Image is required"
        ));
        assert!(validate_image_url("javascript:alert(1)").is_err());
        assert!(validate_image_url("banner.jpg").is_err());
    }
}
