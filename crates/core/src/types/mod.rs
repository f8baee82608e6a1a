//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod guest;
pub mod id;
pub mod price;
pub mod role;
pub mod user_name;

pub use email::{Email, EmailError};
pub use guest::{GuestId, GuestIdError};
pub use id::*;
pub use price::{Price, PriceError};
pub use role::Role;
pub use user_name::{UserName, UserNameError};
