//! Cart route handlers.
//!
//! Every route acts on the cart of the user named in the request, and that
//! user must be the one holding the token.

use axum::{Json, extract::State};
use serde::Deserialize;

use bazaar_core::{ProductId, UserId};

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{RequireAuth, ensure_owner};
use crate::models::CartView;
use crate::response::{self, DataBody};
use crate::services::CartService;
use crate::state::AppState;

/// Body of add-to-cart and update-quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CartLineRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Add units of a product to the cart.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiJson(body): ApiJson<CartLineRequest>,
) -> Result<Json<DataBody<CartView>>> {
    ensure_owner(&claims, body.user_id)?;

    let cart = CartService::new(state.pool())
        .add(body.user_id, body.product_id, body.quantity)
        .await?;
    Ok(response::data(cart))
}

/// Fetch the user's cart.
pub async fn fetch(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<DataBody<CartView>>> {
    ensure_owner(&claims, user_id)?;

    let cart = CartService::new(state.pool()).fetch(user_id).await?;
    Ok(response::data(cart))
}

/// Set the quantity of a line.
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiJson(body): ApiJson<CartLineRequest>,
) -> Result<Json<DataBody<CartView>>> {
    ensure_owner(&claims, body.user_id)?;

    let cart = CartService::new(state.pool())
        .update_quantity(body.user_id, body.product_id, body.quantity)
        .await?;
    Ok(response::data(cart))
}

/// Remove a product's line.
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiPath((user_id, product_id)): ApiPath<(UserId, ProductId)>,
) -> Result<Json<DataBody<CartView>>> {
    ensure_owner(&claims, user_id)?;

    let cart = CartService::new(state.pool())
        .remove_item(user_id, product_id)
        .await?;
    Ok(response::data(cart))
}
