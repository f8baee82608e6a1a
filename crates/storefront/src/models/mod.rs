//! Domain models and JSON views for the storefront.
//!
//! Row types decode straight from `PostgreSQL`; view types are what the API
//! returns. Documents serialize their primary key as `_id` because the SPA
//! reads it under that name.

pub mod address;
pub mod cart;
pub mod feature;
pub mod product;
pub mod user;
pub mod wishlist;

pub use address::Address;
pub use cart::{CartLineView, CartView};
pub use feature::FeatureImage;
pub use product::{
    NewProductRequest, Product, ProductCard, ProductDraft, ProductFilter, ProductInputError,
    ProductPatchRequest, ProductSort, ProductSummary,
};
pub use user::{PublicUser, User};
pub use wishlist::{WishlistItemView, WishlistView};
