//! Cart line items.

use serde::{Deserialize, Serialize};

use super::{ReconcileError, check_quantity};
use crate::ProductId;

/// One product and how many of it the shopper wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// The ordered line items of one cart.
///
/// Holds at most one line per product and never a line with a non-positive
/// quantity. Lines keep the order in which products were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartItems {
    lines: Vec<CartLine>,
}

impl CartItems {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild from stored lines.
    ///
    /// Duplicate products are folded into the first occurrence and
    /// non-positive quantities are dropped, so a corrupted row set cannot
    /// break the invariants.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut items = Self::new();
        for line in lines {
            if line.quantity <= 0 {
                continue;
            }
            match items.position(line.product_id) {
                Some(index) => {
                    if let Some(existing) = items.lines.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(line.quantity);
                    }
                }
                None => items.lines.push(line),
            }
        }
        items
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity currently held for `product_id`.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<i32> {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map(|line| line.quantity)
    }

    /// Add `quantity` units of a product.
    ///
    /// If the product already has a line, the summed quantity is validated
    /// against `total_stock`; otherwise the requested quantity alone is.
    /// On error the cart is left unchanged.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// - `ReconcileError::InvalidQuantity` if `quantity <= 0`
    /// - `ReconcileError::StockExceeded` if the resulting quantity exceeds stock
    pub fn add(
        &mut self,
        product_id: ProductId,
        quantity: i32,
        total_stock: i32,
    ) -> Result<i32, ReconcileError> {
        if quantity <= 0 {
            return Err(ReconcileError::InvalidQuantity);
        }

        let existing = self.quantity_of(product_id).unwrap_or(0);
        let candidate = existing
            .checked_add(quantity)
            .ok_or(ReconcileError::StockExceeded {
                available: total_stock.max(0),
            })?;
        let candidate = check_quantity(candidate, total_stock)?;

        match self.position(product_id) {
            Some(index) => {
                if let Some(line) = self.lines.get_mut(index) {
                    line.quantity = candidate;
                }
            }
            None => self.lines.push(CartLine {
                product_id,
                quantity: candidate,
            }),
        }

        Ok(candidate)
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// - `ReconcileError::ItemNotFound` if the product has no line
    /// - `ReconcileError::InvalidQuantity` / `StockExceeded` from the stock check
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i32,
        total_stock: i32,
    ) -> Result<(), ReconcileError> {
        let index = self
            .position(product_id)
            .ok_or(ReconcileError::ItemNotFound)?;
        let quantity = check_quantity(quantity, total_stock)?;

        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIRT: ProductId = ProductId::new(1);
    const MUG: ProductId = ProductId::new(2);

    #[test]
    fn test_add_to_empty_cart() {
        let mut cart = CartItems::new();
        assert_eq!(cart.add(SHIRT, 4, 10), Ok(4));
        assert_eq!(
            cart.lines(),
            &[CartLine {
                product_id: SHIRT,
                quantity: 4
            }]
        );
    }

    #[test]
    fn test_add_sums_existing_line() {
        let mut cart = CartItems::new();
        cart.add(SHIRT, 3, 10).ok();
        assert_eq!(cart.add(SHIRT, 7, 10), Ok(10));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_add_over_stock_leaves_cart_unchanged() {
        let mut cart = CartItems::new();
        cart.add(SHIRT, 4, 10).ok();
        let before = cart.clone();

        let err = cart.add(SHIRT, 8, 10);
        assert_eq!(err, Err(ReconcileError::StockExceeded { available: 10 }));
        assert_eq!(cart, before);
        assert_eq!(cart.quantity_of(SHIRT), Some(4));
    }

    #[test]
    fn test_add_rejects_zero() {
        let mut cart = CartItems::new();
        assert_eq!(cart.add(SHIRT, 0, 10), Err(ReconcileError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_overflow_is_stock_error() {
        let mut cart = CartItems::from_lines([CartLine {
            product_id: SHIRT,
            quantity: i32::MAX,
        }]);
        assert_eq!(
            cart.add(SHIRT, 1, i32::MAX),
            Err(ReconcileError::StockExceeded {
                available: i32::MAX
            })
        );
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = CartItems::new();
        cart.add(MUG, 1, 5).ok();
        cart.add(SHIRT, 1, 5).ok();
        cart.add(MUG, 1, 5).ok();
        let order: Vec<_> = cart.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(order, vec![MUG, SHIRT]);
    }

    #[test]
    fn test_set_quantity_uses_absolute_value() {
        let mut cart = CartItems::new();
        cart.add(SHIRT, 4, 10).ok();
        assert_eq!(cart.set_quantity(SHIRT, 9, 10), Ok(()));
        assert_eq!(cart.quantity_of(SHIRT), Some(9));
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = CartItems::new();
        assert_eq!(
            cart.set_quantity(SHIRT, 1, 10),
            Err(ReconcileError::ItemNotFound)
        );
    }

    #[test]
    fn test_set_quantity_over_stock() {
        let mut cart = CartItems::new();
        cart.add(SHIRT, 2, 3).ok();
        assert_eq!(
            cart.set_quantity(SHIRT, 4, 3),
            Err(ReconcileError::StockExceeded { available: 3 })
        );
        assert_eq!(cart.quantity_of(SHIRT), Some(2));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = CartItems::new();
        cart.add(SHIRT, 1, 5).ok();
        assert!(cart.remove(SHIRT));
        assert!(!cart.remove(SHIRT));
        assert!(!cart.remove(MUG));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_lines_folds_duplicates() {
        let cart = CartItems::from_lines([
            CartLine {
                product_id: SHIRT,
                quantity: 1,
            },
            CartLine {
                product_id: MUG,
                quantity: 0,
            },
            CartLine {
                product_id: SHIRT,
                quantity: 2,
            },
        ]);
        assert_eq!(cart.quantity_of(SHIRT), Some(3));
        assert_eq!(cart.quantity_of(MUG), None);
    }
}
