//! Wishlist toggle and merge behavior across operation sequences.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use bazaar_core::{GuestId, ProductId, UserId, WishlistItems, WishlistOwner};
use chrono::{TimeZone, Utc};

fn ids(raw: &[i32]) -> Vec<ProductId> {
    raw.iter().copied().map(ProductId::new).collect()
}

#[test]
fn test_toggle_parity_decides_membership() {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let mut wishlist = WishlistItems::new();
    let sequence = [1, 2, 1, 3, 2, 2, 4, 1, 3, 3, 3];

    for &product in &sequence {
        wishlist.toggle(ProductId::new(product), now);
    }

    for product in 1..=4 {
        let toggles = sequence.iter().filter(|&&p| p == product).count();
        assert_eq!(
            wishlist.contains(ProductId::new(product)),
            toggles % 2 == 1,
            "product {product} toggled {toggles} times"
        );
    }
}

#[test]
fn test_toggle_reports_insertion() {
    let now = Utc::now();
    let mut wishlist = WishlistItems::new();
    let product = ProductId::new(9);

    assert!(wishlist.toggle(product, now));
    assert!(!wishlist.toggle(product, now));
    assert!(wishlist.is_empty());
}

#[test]
fn test_merge_is_a_set_union() {
    let now = Utc::now();
    let mut wishlist = WishlistItems::new();
    wishlist.merge(ids(&[1, 2, 3]), now);

    let guest = ids(&[3, 4, 4, 5]);
    let added = wishlist.merge(guest.clone(), now);
    assert_eq!(added, 2);

    let expected: HashSet<ProductId> = ids(&[1, 2, 3, 4, 5]).into_iter().collect();
    assert_eq!(wishlist.product_set(), expected);
    assert_eq!(wishlist.entries().len(), expected.len());

    // Replaying the same guest batch changes nothing.
    let before = wishlist.clone();
    assert_eq!(wishlist.merge(guest, now), 0);
    assert_eq!(wishlist, before);
}

#[test]
fn test_merge_keeps_original_timestamps() {
    let earlier = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

    let mut wishlist = WishlistItems::new();
    wishlist.toggle(ProductId::new(1), earlier);
    wishlist.merge(ids(&[1, 2]), later);

    let first = wishlist.entries()[0];
    assert_eq!(first.product_id, ProductId::new(1));
    assert_eq!(first.added_at, earlier);
    assert_eq!(wishlist.entries()[1].added_at, later);
}

#[test]
fn test_user_id_wins_over_guest_id() {
    let guest = GuestId::parse("b6f1c0de-4a6e-4f5b-9d4e-0c6a1b2c3d4e").unwrap();

    assert_eq!(
        WishlistOwner::resolve(Some(UserId::new(3)), Some(guest.clone())),
        Some(WishlistOwner::User(UserId::new(3)))
    );
    assert_eq!(
        WishlistOwner::resolve(None, Some(guest.clone())),
        Some(WishlistOwner::Guest(guest))
    );
    assert_eq!(WishlistOwner::resolve(None, None), None);
}
