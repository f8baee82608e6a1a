//! Reconciliation rules for per-owner collections.
//!
//! Each submodule owns the in-memory half of one read-modify-write cycle:
//! the storefront loads a document's items under a row lock, calls into these
//! functions, and writes back the result. Nothing here touches I/O, so every
//! invariant (stock ceilings, one line per product, address capacity) is
//! checked in one place and unit tested without a database.

pub mod address;
pub mod cart;
pub mod patch;
pub mod stock;
pub mod wishlist;

use thiserror::Error;

pub use address::{AddressFields, AddressPatch, MAX_ADDRESSES};
pub use cart::{CartItems, CartLine};
pub use patch::PricePatch;
pub use stock::check_quantity;
pub use wishlist::{WishlistEntry, WishlistItems, WishlistOwner};

/// Errors raised by the reconcilers.
///
/// The `Display` text is shown to shoppers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Requested quantity is zero or negative.
    #[error("Quantity must be greater than zero")]
    InvalidQuantity,

    /// Requested quantity is above the product's stock.
    #[error("Only {available} items available in stock")]
    StockExceeded {
        /// Units the product currently has.
        available: i32,
    },

    /// The product has no line in the collection.
    #[error("Item not found")]
    ItemNotFound,

    /// The owner already holds the maximum number of entries.
    #[error("You can add at most {max} addresses")]
    CapacityExceeded {
        /// Capacity per owner.
        max: usize,
    },

    /// A required text field was missing or blank.
    #[error("{field} is required")]
    MissingField {
        /// Name of the field as the client sends it.
        field: &'static str,
    },
}
