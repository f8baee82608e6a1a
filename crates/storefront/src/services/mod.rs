//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Registration, login, and bearer tokens
//! - `cart` - Cart reconciliation under a per-user row lock
//! - `wishlist` - Wishlist toggle, merge, and removal for users and guests
//! - `address` - Address book with a per-user capacity
//! - `products` - Admin catalog management and the shop listing
//! - `features` - Home page banner images
//!
//! Each write runs in one transaction: lock the owning row, load its items,
//! apply the pure rules from `bazaar_core::reconcile`, write back, commit.

pub mod address;
pub mod auth;
pub mod cart;
pub mod features;
pub mod products;
pub mod wishlist;

pub use address::AddressService;
pub use auth::AuthService;
pub use cart::CartService;
pub use features::FeatureService;
pub use products::ProductService;
pub use wishlist::WishlistService;
