//! Bazaar Core - Shared types and reconciliation rules.
//!
//! This crate provides the domain vocabulary used across all Bazaar components:
//! - `storefront` - JSON API server for the shop and admin panel
//! - `cli` - Command-line tools for migrations, seeding and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. The storefront loads a document, hands its items to
//! the functions in [`reconcile`], and persists whatever comes back.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles
//! - [`reconcile`] - Cart, wishlist and address book rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod reconcile;
pub mod types;

pub use reconcile::{
    AddressFields, AddressPatch, CartItems, CartLine, PricePatch, ReconcileError, WishlistEntry,
    WishlistItems, WishlistOwner,
};
pub use types::*;
