//! Wishlist views.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{ProductId, UserId, WishlistId, WishlistItems, WishlistOwner};

use super::product::{ProductCard, ProductSummary};

/// One wished-for product with its details filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemView {
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
    pub product: ProductCard,
}

/// A wishlist as returned by every wishlist endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    /// `None` when the owner has never toggled anything.
    #[serde(rename = "_id")]
    pub id: Option<WishlistId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    pub items: Vec<WishlistItemView>,
}

impl WishlistView {
    /// The view of an owner without a stored wishlist.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            id: None,
            user_id: None,
            guest_id: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn build(
        id: WishlistId,
        owner: &WishlistOwner,
        items: &WishlistItems,
        products: &HashMap<ProductId, ProductSummary>,
    ) -> Self {
        let guest_id = match owner {
            WishlistOwner::Guest(guest) => Some(guest.as_str().to_owned()),
            WishlistOwner::User(_) => None,
        };

        Self {
            id: Some(id),
            user_id: owner.user_id(),
            guest_id,
            items: items
                .entries()
                .iter()
                .map(|entry| WishlistItemView {
                    product_id: entry.product_id,
                    added_at: entry.added_at,
                    product: ProductCard::new(products.get(&entry.product_id)),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::GuestId;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_shape() {
        let json = serde_json::to_value(WishlistView::empty()).unwrap();
        assert_eq!(json, json!({"_id": null, "items": []}));
    }

    #[test]
    fn test_guest_owner_shape() {
        let owner = WishlistOwner::Guest(GuestId::parse("g-42").unwrap());
        let mut items = WishlistItems::new();
        items.toggle(ProductId::new(9), Utc::now());

        let view = WishlistView::build(WishlistId::new(1), &owner, &items, &HashMap::new());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["guestId"], "g-42");
        assert!(json.get("userId").is_none());
        assert_eq!(json["items"][0]["productId"], 9);
        assert_eq!(json["items"][0]["product"]["title"], "Product not found");
    }
}
