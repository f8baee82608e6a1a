//! Startup checks that must pass before the server binds.

use thiserror::Error;

use crate::cloudinary::{CloudinaryClient, CloudinaryError};
use crate::config::ConfigError;

/// Reasons the server refuses to start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cloudinary credentials rejected: {0}")]
    ImageHost(#[from] CloudinaryError),
}

/// Confirm the image host accepts our credentials.
///
/// # Errors
///
/// Returns `StartupError::ImageHost` if the ping fails for any reason.
pub async fn verify_image_host(client: &CloudinaryClient) -> Result<(), StartupError> {
    client.ping().await?;
    tracing::info!("Cloudinary credentials verified");
    Ok(())
}
