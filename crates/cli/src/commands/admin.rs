//! User role management commands.
//!
//! There is no admin signup: an account registers through the shop like any
//! other and is then promoted here.
//!
//! # Usage
//!
//! ```bash
//! bazaar-cli admin promote -e admin@example.com
//! bazaar-cli admin demote -e former-admin@example.com
//! ```

use thiserror::Error;

use bazaar_core::{Email, EmailError, Role};
use bazaar_storefront::db::{self, RepositoryError, UserRepository};

/// Errors that can occur during role changes.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No user registered with that email.
    #[error("No user registered with email: {0}")]
    UnknownUser(String),

    /// Repository error.
    #[error("{0}")]
    Repository(RepositoryError),
}

/// Set the role of the user registered under `email`.
///
/// # Errors
///
/// Returns `AdminError::UnknownUser` if nobody registered with that email.
pub async fn set_role(email: &str, role: Role) -> Result<(), AdminError> {
    let email = Email::parse(email)?;

    let database_url =
        super::database_url().map_err(|_| AdminError::MissingEnvVar("BAZAAR_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    let user = UserRepository::new(&pool)
        .set_role(&email, role)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UnknownUser(email.as_str().to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Role updated! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );
    Ok(())
}
