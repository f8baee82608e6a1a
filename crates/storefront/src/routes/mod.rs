//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                   - Liveness
//! GET    /health/ready                             - Database readiness
//!
//! # Auth
//! POST   /api/auth/register                        - Create account (rate limited)
//! POST   /api/auth/login                           - Issue bearer token (rate limited)
//! POST   /api/auth/logout                          - Acknowledge logout
//! GET    /api/auth/check-auth                      - Current user from token
//!
//! # Cart (bearer, self)
//! POST   /api/shop/cart/add                        - Add units of a product
//! GET    /api/shop/cart/get/{userId}               - Fetch cart
//! PUT    /api/shop/cart/update-cart                - Set a line's quantity
//! DELETE /api/shop/cart/{userId}/{productId}       - Remove a line
//!
//! # Wishlist
//! POST   /api/shop/wishlist/add                    - Toggle (user or guest)
//! GET    /api/shop/wishlist/{userId}               - Fetch user wishlist
//! GET    /api/shop/wishlist/guest/{guestId}        - Fetch guest wishlist
//! POST   /api/shop/wishlist/merge                  - Fold guest items into user
//! DELETE /api/shop/wishlist/{userId}/{productId}   - Remove a product
//!
//! # Address book (bearer, self)
//! POST   /api/shop/address/add
//! GET    /api/shop/address/get/{userId}
//! PUT    /api/shop/address/update/{userId}/{addressId}
//! DELETE /api/shop/address/delete/{userId}/{addressId}
//!
//! # Catalog
//! GET    /api/shop/products/get                    - Filtered listing
//! GET    /api/shop/products/get/{id}               - Product details
//!
//! # Admin catalog (bearer, admin)
//! POST   /api/admin/products/upload-image          - Multipart `my_file`
//! POST   /api/admin/products/add
//! GET    /api/admin/products/get
//! PUT    /api/admin/products/edit/{id}
//! DELETE /api/admin/products/delete/{id}
//!
//! # Feature images
//! POST   /api/common/feature/add                   - Admin adds a banner URL
//! GET    /api/common/feature/get                   - Banners, oldest first
//! ```

pub mod address;
pub mod admin_products;
pub mod auth;
pub mod cart;
pub mod features;
pub mod health;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Request body cap on the image upload route.
pub const UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    let credentials = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter());

    Router::new()
        .merge(credentials)
        .route("/logout", post(auth::logout))
        .route("/check-auth", get(auth::check_auth))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/get/{user_id}", get(cart::fetch))
        .route("/update-cart", put(cart::update_quantity))
        .route("/{user_id}/{product_id}", delete(cart::remove_item))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(wishlist::toggle))
        .route("/merge", post(wishlist::merge))
        .route("/guest/{guest_id}", get(wishlist::fetch_for_guest))
        .route("/{user_id}", get(wishlist::fetch_for_user))
        .route("/{user_id}/{product_id}", delete(wishlist::remove))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(address::add))
        .route("/get/{user_id}", get(address::list))
        .route("/update/{user_id}/{address_id}", put(address::edit))
        .route("/delete/{user_id}/{address_id}", delete(address::delete))
}

/// Create the shop catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/get", get(products::list))
        .route("/get/{id}", get(products::details))
}

/// Create the admin catalog routes router.
pub fn admin_product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/upload-image",
            post(admin_products::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/add", post(admin_products::add))
        .route("/get", get(admin_products::list))
        .route("/edit/{id}", put(admin_products::edit))
        .route("/delete/{id}", delete(admin_products::delete))
}

/// Create the feature image routes router.
pub fn feature_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(features::add))
        .route("/get", get(features::list))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/auth", auth_routes())
        .nest("/api/shop/cart", cart_routes())
        .nest("/api/shop/wishlist", wishlist_routes())
        .nest("/api/shop/address", address_routes())
        .nest("/api/shop/products", product_routes())
        .nest("/api/admin/products", admin_product_routes())
        .nest("/api/common/feature", feature_routes())
}
