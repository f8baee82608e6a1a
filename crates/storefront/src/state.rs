//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cloudinary::CloudinaryClient;
use crate::config::StorefrontConfig;
use crate::services::auth::TokenIssuer;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    tokens: TokenIssuer,
    cloudinary: CloudinaryClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let cloudinary = CloudinaryClient::new(&config.cloudinary);
        Self::with_cloudinary(config, pool, cloudinary)
    }

    /// Create application state with a specific image host client.
    #[must_use]
    pub fn with_cloudinary(
        config: StorefrontConfig,
        pool: PgPool,
        cloudinary: CloudinaryClient,
    ) -> Self {
        let tokens = TokenIssuer::new(&config.jwt.secret, config.jwt.ttl_minutes);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                cloudinary,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the bearer token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    /// Get a reference to the Cloudinary client.
    #[must_use]
    pub fn cloudinary(&self) -> &CloudinaryClient {
        &self.inner.cloudinary
    }
}
