//! Wishlist entries and ownership.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GuestId, ProductId, UserId};

/// Who a wishlist belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WishlistOwner {
    /// A registered shopper.
    User(UserId),
    /// An anonymous browser session.
    Guest(GuestId),
}

impl WishlistOwner {
    /// Pick the owner from whichever identifier the client sent.
    ///
    /// A user ID takes precedence over a guest ID. Returns `None` when
    /// neither is present.
    #[must_use]
    pub fn resolve(user_id: Option<UserId>, guest_id: Option<GuestId>) -> Option<Self> {
        user_id
            .map(Self::User)
            .or_else(|| guest_id.map(Self::Guest))
    }

    /// The user ID, if this is a registered owner.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Guest(_) => None,
        }
    }
}

/// One wished-for product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// The entries of one wishlist.
///
/// A product appears at most once. Entries keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistItems {
    entries: Vec<WishlistEntry>,
}

impl WishlistItems {
    /// An empty wishlist.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild from stored entries, keeping the first of any duplicates.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = WishlistEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.product_id))
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|e| e.product_id == product_id)
    }

    /// Remove the product if present, otherwise append it.
    ///
    /// Returns `true` only when the product was newly inserted.
    pub fn toggle(&mut self, product_id: ProductId, now: DateTime<Utc>) -> bool {
        if self.remove(product_id) {
            return false;
        }
        self.entries.push(WishlistEntry {
            product_id,
            added_at: now,
        });
        true
    }

    /// Union guest-held products into this wishlist.
    ///
    /// Products already present (or repeated within the batch) are skipped,
    /// so merging the same batch twice is a no-op the second time.
    /// Returns how many entries were added.
    pub fn merge(
        &mut self,
        product_ids: impl IntoIterator<Item = ProductId>,
        now: DateTime<Utc>,
    ) -> usize {
        let mut present: HashSet<ProductId> = self.entries.iter().map(|e| e.product_id).collect();
        let before = self.entries.len();

        for product_id in product_ids {
            if present.insert(product_id) {
                self.entries.push(WishlistEntry {
                    product_id,
                    added_at: now,
                });
            }
        }

        self.entries.len() - before
    }

    /// Remove a product. Returns whether an entry was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != product_id);
        self.entries.len() != before
    }

    fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.entries.iter().map(|e| e.product_id)
    }

    /// Product IDs as a set, for order-insensitive comparisons.
    #[must_use]
    pub fn product_set(&self) -> HashSet<ProductId> {
        self.product_ids().collect()
    }
}
