//! Stock/quantity validation.

use super::ReconcileError;

/// Check a requested quantity against a product's stock.
///
/// Accepts iff `0 < quantity <= total_stock` and returns the quantity back so
/// callers can chain it. When a line already exists, pass the summed quantity,
/// not the delta.
///
/// # Errors
///
/// - `ReconcileError::InvalidQuantity` when `quantity <= 0`
/// - `ReconcileError::StockExceeded` when `quantity > total_stock`
///
/// ```
/// use bazaar_core::reconcile::check_quantity;
///
/// assert_eq!(check_quantity(4, 10), Ok(4));
/// assert_eq!(
///     check_quantity(12, 10).unwrap_err().to_string(),
///     "Only 10 items available in stock"
/// );
/// ```
pub const fn check_quantity(quantity: i32, total_stock: i32) -> Result<i32, ReconcileError> {
    if quantity <= 0 {
        return Err(ReconcileError::InvalidQuantity);
    }
    if quantity > total_stock {
        return Err(ReconcileError::StockExceeded {
            available: if total_stock < 0 { 0 } else { total_stock },
        });
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_within_stock() {
        assert_eq!(check_quantity(1, 1), Ok(1));
        assert_eq!(check_quantity(10, 10), Ok(10));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(check_quantity(0, 5), Err(ReconcileError::InvalidQuantity));
        assert_eq!(check_quantity(-2, 5), Err(ReconcileError::InvalidQuantity));
    }

    #[test]
    fn test_rejects_over_stock_with_available_count() {
        assert_eq!(
            check_quantity(6, 5),
            Err(ReconcileError::StockExceeded { available: 5 })
        );
    }

    #[test]
    fn test_out_of_stock_product() {
        assert_eq!(
            check_quantity(1, 0),
            Err(ReconcileError::StockExceeded { available: 0 })
        );
    }
}
