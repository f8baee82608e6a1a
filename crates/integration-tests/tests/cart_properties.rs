//! Cart invariants held across long sequences of operations.
//!
//! Every sequence below is applied to a fresh `CartItems`; after each step
//! the cart must hold at most one line per product, no non-positive
//! quantity, and no quantity above the product's stock.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use bazaar_core::{CartItems, CartLine, ProductId, ReconcileError};

const STOCK: [i32; 4] = [0, 1, 5, 20];

fn stock_of(product: ProductId) -> i32 {
    let index = usize::try_from(product.as_i32()).unwrap() % STOCK.len();
    STOCK[index]
}

fn assert_invariants(cart: &CartItems) {
    let mut seen = HashSet::new();
    for line in cart.lines() {
        assert!(seen.insert(line.product_id), "duplicate line {line:?}");
        assert!(line.quantity > 0, "non-positive quantity {line:?}");
        assert!(
            line.quantity <= stock_of(line.product_id),
            "over stock {line:?}"
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Add(i32, i32),
    Set(i32, i32),
    Remove(i32),
}

fn apply(cart: &mut CartItems, op: Op) -> Result<(), ReconcileError> {
    match op {
        Op::Add(product, quantity) => {
            let id = ProductId::new(product);
            cart.add(id, quantity, stock_of(id)).map(|_| ())
        }
        Op::Set(product, quantity) => {
            let id = ProductId::new(product);
            cart.set_quantity(id, quantity, stock_of(id))
        }
        Op::Remove(product) => {
            cart.remove(ProductId::new(product));
            Ok(())
        }
    }
}

/// Every combination of operation kind, product and quantity, in a fixed
/// interleaving.
fn operations() -> Vec<Op> {
    let mut ops = Vec::new();
    for round in 0_i32..6 {
        for product in 1..=8 {
            for quantity in [-1, 0, 1, 2, 4, 7, 21] {
                ops.push(match (round + product + quantity).rem_euclid(5) {
                    0 | 1 => Op::Add(product, quantity),
                    2 | 3 => Op::Set(product, quantity),
                    _ => Op::Remove(product),
                });
            }
        }
    }
    ops
}

#[test]
fn test_invariants_hold_after_every_step() {
    let mut cart = CartItems::new();
    for op in operations() {
        let _ = apply(&mut cart, op);
        assert_invariants(&cart);
    }
}

#[test]
fn test_rejected_operations_leave_cart_unchanged() {
    let mut cart = CartItems::new();
    for op in operations() {
        let before = cart.clone();
        if apply(&mut cart, op).is_err() {
            assert_eq!(cart, before, "{op:?} mutated the cart on error");
        }
    }
}

#[test]
fn test_adding_in_steps_matches_adding_at_once() {
    let product = ProductId::new(3); // stock 20
    let mut stepwise = CartItems::new();
    for _ in 0..4 {
        stepwise.add(product, 3, 20).unwrap();
    }

    let mut at_once = CartItems::new();
    at_once.add(product, 12, 20).unwrap();

    assert_eq!(stepwise, at_once);
}

#[test]
fn test_line_order_follows_first_add() {
    let mut cart = CartItems::new();
    for product in [3, 7, 11, 3, 15, 7] {
        let id = ProductId::new(product);
        cart.add(id, 1, 20).unwrap();
    }

    let order: Vec<i32> = cart.lines().iter().map(|l| l.product_id.as_i32()).collect();
    assert_eq!(order, vec![3, 7, 11, 15]);
}

#[test]
fn test_stock_error_reports_available_units() {
    let mut cart = CartItems::new();
    let product = ProductId::new(2); // stock 5
    cart.add(product, 4, 5).unwrap();

    let err = cart.add(product, 2, 5).unwrap_err();
    assert_eq!(err, ReconcileError::StockExceeded { available: 5 });
    assert_eq!(err.to_string(), "Only 5 items available in stock");
    assert_eq!(cart.quantity_of(product), Some(4));
}

#[test]
fn test_stored_rows_are_normalized() {
    let cart = CartItems::from_lines([
        CartLine {
            product_id: ProductId::new(1),
            quantity: 2,
        },
        CartLine {
            product_id: ProductId::new(2),
            quantity: 0,
        },
        CartLine {
            product_id: ProductId::new(1),
            quantity: 3,
        },
    ]);

    assert_eq!(
        cart.lines(),
        &[CartLine {
            product_id: ProductId::new(1),
            quantity: 5,
        }]
    );
}
