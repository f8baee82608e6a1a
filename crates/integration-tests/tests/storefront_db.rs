//! Storefront services and routes over a migrated `PostgreSQL` database.
//!
//! Each test receives its own database from `#[sqlx::test]`.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bazaar_core::{
    AddressFields, AddressId, AddressPatch, GuestId, ProductId, ReconcileError, Role, UserId,
    WishlistOwner,
};
use bazaar_integration_tests::{
    app_with_pool, body_json, empty_request, insert_product, insert_user, json_request, token_for,
};
use bazaar_storefront::error::AppError;
use bazaar_storefront::services::{AddressService, CartService, WishlistService};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

fn cart_lines(body: &Value) -> Vec<(i64, i64)> {
    body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| {
            (
                line["productId"].as_i64().unwrap(),
                line["quantity"].as_i64().unwrap(),
            )
        })
        .collect()
}

fn sample_address(street: &str) -> AddressFields {
    AddressFields::new(street, "London", "5550100", "NW16XE", "Ring twice").unwrap()
}

// =============================================================================
// Cart
// =============================================================================

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_cart_fetch_without_cart_is_empty_view(pool: PgPool) {
    let user = insert_user(&pool, "ada").await;
    let (app, state) = app_with_pool(pool);
    let token = token_for(&state, user, Role::User);

    let (status, body) = send(
        &app,
        empty_request("GET", &format!("/api/shop/cart/get/{user}"), Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "_id": null, "userId": user, "items": [] })
    );
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_cart_update_without_cart_is_not_found(pool: PgPool) {
    let user = insert_user(&pool, "ben").await;
    let mug = insert_product(&pool, "Mug", 10).await;
    let (app, state) = app_with_pool(pool);
    let token = token_for(&state, user, Role::User);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/shop/cart/update-cart",
            Some(&token),
            &json!({ "userId": user, "productId": mug, "quantity": 2 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cart not found");
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_cart_update_unknown_line_is_not_found(pool: PgPool) {
    let user = UserId::new(insert_user(&pool, "cy").await);
    let mug = ProductId::new(insert_product(&pool, "Mug", 10).await);
    let lamp = ProductId::new(insert_product(&pool, "Lamp", 10).await);
    let carts = CartService::new(&pool);

    carts.add(user, mug, 1).await.unwrap();
    let err = carts.update_quantity(user, lamp, 2).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(msg) if msg == "Item not found in cart"));
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_cart_add_sums_quantities_and_keeps_order(pool: PgPool) {
    let user = insert_user(&pool, "dee").await;
    let mug = insert_product(&pool, "Mug", 10).await;
    let lamp = insert_product(&pool, "Lamp", 3).await;
    let (app, state) = app_with_pool(pool);
    let token = token_for(&state, user, Role::User);

    for (product, quantity) in [(mug, 4), (lamp, 1), (mug, 2)] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/shop/cart/add",
                Some(&token),
                &json!({ "userId": user, "productId": product, "quantity": quantity }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/shop/cart/add",
            Some(&token),
            &json!({ "userId": user, "productId": mug, "quantity": 5 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only 10 items available in stock");

    let (_, body) = send(
        &app,
        empty_request("GET", &format!("/api/shop/cart/get/{user}"), Some(&token)),
    )
    .await;
    assert_eq!(
        cart_lines(&body),
        vec![(i64::from(mug), 6), (i64::from(lamp), 1)]
    );
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_cart_remove_absent_line_keeps_cart(pool: PgPool) {
    let user = UserId::new(insert_user(&pool, "eve").await);
    let mug = ProductId::new(insert_product(&pool, "Mug", 10).await);
    let carts = CartService::new(&pool);

    let err = carts.remove_item(user, mug).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(msg) if msg == "Cart not found"));

    let before = carts.add(user, mug, 2).await.unwrap();
    let after = carts.remove_item(user, ProductId::new(999)).await.unwrap();
    assert_eq!(after, before);
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_cart_renders_deleted_product_placeholder(pool: PgPool) {
    let user = UserId::new(insert_user(&pool, "fay").await);
    let mug = ProductId::new(insert_product(&pool, "Mug", 10).await);
    let carts = CartService::new(&pool);
    carts.add(user, mug, 2).await.unwrap();

    sqlx::query("DELETE FROM shop.product WHERE id = $1")
        .bind(mug)
        .execute(&pool)
        .await
        .unwrap();

    let view = serde_json::to_value(carts.fetch(user).await.unwrap()).unwrap();
    let line = &view["items"][0];
    assert_eq!(line["productId"], Value::Null);
    assert_eq!(line["title"], "Product not found");
    assert_eq!(line["price"], Value::Null);
    assert_eq!(line["totalStock"], 0);
    assert_eq!(line["quantity"], 2);
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_cart_writes_reuse_the_cart_row(pool: PgPool) {
    let first = UserId::new(insert_user(&pool, "gus").await);
    let second = UserId::new(insert_user(&pool, "hal").await);
    let mug = ProductId::new(insert_product(&pool, "Mug", 10).await);
    let carts = CartService::new(&pool);

    let created = carts.add(first, mug, 1).await.unwrap().id.unwrap();
    for _ in 0..3 {
        assert_eq!(carts.add(first, mug, 1).await.unwrap().id, Some(created));
    }

    let next = carts.add(second, mug, 1).await.unwrap().id.unwrap();
    assert_eq!(next.as_i32(), created.as_i32() + 1);
}

// =============================================================================
// Wishlist
// =============================================================================

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_wishlist_remove_without_wishlist_is_not_found(pool: PgPool) {
    let user = UserId::new(insert_user(&pool, "ivy").await);

    let err = WishlistService::new(&pool)
        .remove(user, ProductId::new(1))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(msg) if msg == "Wishlist not found"));
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_guest_toggle_alternates_on_one_wishlist(pool: PgPool) {
    let mug = insert_product(&pool, "Mug", 10).await;
    let (app, _) = app_with_pool(pool);
    let guest = "4f1c2b8e-6a7d-4e0f-9b3a-2c5d8e1f0a6b";

    let mut ids = Vec::new();
    for expected in [true, false, true] {
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/shop/wishlist/add",
                None,
                &json!({ "guestId": guest, "productId": mug }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isWishlisted"], expected);
        ids.push(body["data"]["_id"].as_i64().unwrap());
    }
    assert!(ids.iter().all(|&id| id == ids[0]));

    let (_, other) = send(
        &app,
        json_request(
            "POST",
            "/api/shop/wishlist/add",
            None,
            &json!({ "guestId": "another-guest", "productId": mug }),
        ),
    )
    .await;
    assert_eq!(other["data"]["_id"].as_i64().unwrap(), ids[0] + 1);

    let (_, fetched) = send(
        &app,
        empty_request("GET", &format!("/api/shop/wishlist/guest/{guest}"), None),
    )
    .await;
    assert_eq!(fetched["data"]["items"][0]["productId"], mug);
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_wishlist_merge_twice_is_idempotent(pool: PgPool) {
    let user = UserId::new(insert_user(&pool, "jo").await);
    let mug = ProductId::new(insert_product(&pool, "Mug", 10).await);
    let lamp = ProductId::new(insert_product(&pool, "Lamp", 10).await);
    let wishlists = WishlistService::new(&pool);

    wishlists
        .toggle(&WishlistOwner::User(user), lamp)
        .await
        .unwrap();
    let first = wishlists.merge(user, [mug, lamp, mug]).await.unwrap();
    let second = wishlists.merge(user, [mug, lamp]).await.unwrap();

    assert_eq!(first, second);
    let products: Vec<ProductId> = second.items.iter().map(|i| i.product_id).collect();
    assert_eq!(products, vec![lamp, mug]);
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_fetch_unknown_guest_is_empty_view(pool: PgPool) {
    let owner = WishlistOwner::Guest(GuestId::parse("never-seen").unwrap());

    let view = WishlistService::new(&pool).fetch(&owner).await.unwrap();

    assert_eq!(
        serde_json::to_value(view).unwrap(),
        json!({ "_id": null, "items": [] })
    );
}

// =============================================================================
// Address book
// =============================================================================

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_fourth_address_is_rejected(pool: PgPool) {
    let user = UserId::new(insert_user(&pool, "kim").await);
    let book = AddressService::new(&pool);

    for street in ["1 High St", "2 High St", "3 High St"] {
        book.add(user, &sample_address(street)).await.unwrap();
    }
    let err = book.add(user, &sample_address("4 High St")).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Reconcile(ReconcileError::CapacityExceeded { max: 3 })
    ));
    assert_eq!(book.list(user).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_address_of_another_user_is_not_found(pool: PgPool) {
    let owner = UserId::new(insert_user(&pool, "lea").await);
    let intruder = UserId::new(insert_user(&pool, "max").await);
    let book = AddressService::new(&pool);
    let address = book.add(owner, &sample_address("9 Elm Rd")).await.unwrap();

    let patch = AddressPatch {
        city: Some("Paris".to_string()),
        ..AddressPatch::default()
    };
    let edit = book.edit(intruder, address.id, &patch).await.unwrap_err();
    assert!(matches!(edit, AppError::NotFound(msg) if msg == "Address not found"));

    let delete = book.delete(intruder, address.id).await.unwrap_err();
    assert!(matches!(delete, AppError::NotFound(_)));

    let missing = book.delete(owner, AddressId::new(9999)).await.unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));

    assert_eq!(book.list(owner).await.unwrap(), vec![address]);
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_address_edit_keeps_blank_fields(pool: PgPool) {
    let user = insert_user(&pool, "ned").await;
    let address = AddressService::new(&pool)
        .add(UserId::new(user), &sample_address("5 Oak Ave"))
        .await
        .unwrap();
    let (app, state) = app_with_pool(pool);
    let token = token_for(&state, user, Role::User);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/shop/address/update/{user}/{}", address.id),
            Some(&token),
            &json!({ "city": "  ", "phone": "5550199" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "London");
    assert_eq!(body["data"]["phone"], "5550199");
    assert_eq!(body["data"]["address"], "5 Oak Ave");
}

// =============================================================================
// Catalog
// =============================================================================

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_product_edit_blank_price_is_zero(pool: PgPool) {
    let lamp = insert_product(&pool, "Lamp", 4).await;
    let (app, state) = app_with_pool(pool);
    let token = token_for(&state, 1, Role::Admin);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/products/edit/{lamp}"),
            Some(&token),
            &json!({ "price": "", "title": "" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"].as_f64(), Some(0.0));
    assert_eq!(body["data"]["title"], "Lamp");
    assert_eq!(body["data"]["totalStock"], 4);
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_feature_images_round_trip(pool: PgPool) {
    let (app, state) = app_with_pool(pool);
    let token = token_for(&state, 1, Role::Admin);

    for banner in ["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/common/feature/add",
                Some(&token),
                &json!({ "image": banner }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, empty_request("GET", "/api/common/feature/get", None)).await;
    assert_eq!(status, StatusCode::OK);
    let images: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["image"].as_str().unwrap())
        .collect();
    assert_eq!(
        images,
        vec!["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"]
    );
}
