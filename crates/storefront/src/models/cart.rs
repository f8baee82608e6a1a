//! Cart views.

use std::collections::HashMap;

use serde::Serialize;

use bazaar_core::{CartId, CartItems, CartLine, ProductId, UserId};

use super::product::{ProductCard, ProductSummary};

/// One cart line with its product details filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    /// `None` when the product has been deleted since it was added.
    pub product_id: Option<ProductId>,
    #[serde(flatten)]
    pub product: ProductCard,
    pub quantity: i32,
}

impl CartLineView {
    #[must_use]
    pub fn new(line: &CartLine, product: Option<&ProductSummary>) -> Self {
        Self {
            product_id: product.map(|p| p.id),
            product: ProductCard::new(product),
            quantity: line.quantity,
        }
    }
}

/// A cart as returned by every cart endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// `None` until the user first adds something.
    #[serde(rename = "_id")]
    pub id: Option<CartId>,
    pub user_id: UserId,
    pub items: Vec<CartLineView>,
}

impl CartView {
    /// The view of a user who has never added to a cart.
    #[must_use]
    pub const fn empty(user_id: UserId) -> Self {
        Self {
            id: None,
            user_id,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn build(
        id: CartId,
        user_id: UserId,
        items: &CartItems,
        products: &HashMap<ProductId, ProductSummary>,
    ) -> Self {
        Self {
            id: Some(id),
            user_id,
            items: items
                .lines()
                .iter()
                .map(|line| CartLineView::new(line, products.get(&line.product_id)))
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Price;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_cart_shape() {
        let view = serde_json::to_value(CartView::empty(UserId::new(7))).unwrap();
        assert_eq!(view, json!({"_id": null, "userId": 7, "items": []}));
    }

    #[test]
    fn test_deleted_product_renders_placeholder() {
        let mut items = CartItems::new();
        items.add(ProductId::new(1), 2, 5).unwrap();
        items.add(ProductId::new(2), 1, 5).unwrap();

        let products = HashMap::from([(
            ProductId::new(1),
            ProductSummary {
                id: ProductId::new(1),
                image: Some("a.png".to_owned()),
                title: "Mug".to_owned(),
                price: Price::parse("8").unwrap(),
                sale_price: None,
                total_stock: 5,
            },
        )]);

        let view = CartView::build(CartId::new(3), UserId::new(7), &items, &products);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(
            json["items"][0],
            json!({
                "productId": 1,
                "image": "a.png",
                "title": "Mug",
                "price": 8.0,
                "salePrice": null,
                "quantity": 2,
                "totalStock": 5
            })
        );
        assert_eq!(
            json["items"][1],
            json!({
                "productId": null,
                "image": null,
                "title": "Product not found",
                "price": null,
                "salePrice": null,
                "quantity": 1,
                "totalStock": 0
            })
        );
    }
}
