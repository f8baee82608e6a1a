//! Wishlist route handlers.
//!
//! Guests toggle and read by guest id without a token. Once a user id is in
//! play the token must belong to that user.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use bazaar_core::{GuestId, ProductId, UserId, WishlistOwner};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{OptionalAuth, RequireAuth, ensure_owner};
use crate::models::WishlistView;
use crate::response::{self, DataBody};
use crate::services::WishlistService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToggleRequest {
    pub user_id: Option<UserId>,
    pub guest_id: Option<String>,
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub success: bool,
    pub data: WishlistView,
    pub is_wishlisted: bool,
}

/// A product reference from the guest's local wishlist.
///
/// Older clients send the populated product document instead of its id.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(ProductId),
    Document {
        #[serde(rename = "_id")]
        id: ProductId,
    },
}

impl ProductRef {
    #[must_use]
    pub const fn id(self) -> ProductId {
        match self {
            Self::Id(id) | Self::Document { id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestItem {
    pub product_id: ProductRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MergeRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<GuestItem>,
}

/// Toggle a product on a user's or guest's wishlist.
pub async fn toggle(
    State(state): State<AppState>,
    OptionalAuth(claims): OptionalAuth,
    ApiJson(body): ApiJson<ToggleRequest>,
) -> Result<Json<ToggleResponse>> {
    let owner = match (body.user_id, body.guest_id.as_deref()) {
        (Some(user_id), _) => {
            let claims = claims.ok_or(AppError::Unauthorized)?;
            ensure_owner(&claims, user_id)?;
            WishlistOwner::User(user_id)
        }
        (None, Some(guest_id)) => WishlistOwner::Guest(parse_guest_id(guest_id)?),
        (None, None) => {
            return Err(AppError::BadRequest(
                "User ID or Guest ID is required".to_string(),
            ));
        }
    };

    let (wishlist, is_wishlisted) = WishlistService::new(state.pool())
        .toggle(&owner, body.product_id)
        .await?;

    Ok(Json(ToggleResponse {
        success: true,
        data: wishlist,
        is_wishlisted,
    }))
}

/// Fetch a user's wishlist.
pub async fn fetch_for_user(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<DataBody<WishlistView>>> {
    ensure_owner(&claims, user_id)?;

    let wishlist = WishlistService::new(state.pool())
        .fetch(&WishlistOwner::User(user_id))
        .await?;
    Ok(response::data(wishlist))
}

/// Fetch a guest's wishlist.
pub async fn fetch_for_guest(
    State(state): State<AppState>,
    ApiPath(guest_id): ApiPath<String>,
) -> Result<Json<DataBody<WishlistView>>> {
    let owner = WishlistOwner::Guest(parse_guest_id(&guest_id)?);

    let wishlist = WishlistService::new(state.pool()).fetch(&owner).await?;
    Ok(response::data(wishlist))
}

/// Fold a guest's wishlist into the user's after login.
pub async fn merge(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiJson(body): ApiJson<MergeRequest>,
) -> Result<Json<DataBody<WishlistView>>> {
    ensure_owner(&claims, body.user_id)?;

    let product_ids: Vec<ProductId> = body.items.iter().map(|item| item.product_id.id()).collect();
    let wishlist = WishlistService::new(state.pool())
        .merge(body.user_id, product_ids)
        .await?;
    Ok(response::data(wishlist))
}

/// Remove a product from the user's wishlist.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiPath((user_id, product_id)): ApiPath<(UserId, ProductId)>,
) -> Result<Json<DataBody<WishlistView>>> {
    ensure_owner(&claims, user_id)?;

    let wishlist = WishlistService::new(state.pool())
        .remove(user_id, product_id)
        .await?;
    Ok(response::data(wishlist))
}

fn parse_guest_id(raw: &str) -> Result<GuestId> {
    GuestId::parse(raw).map_err(|e| AppError::BadRequest(format!("Invalid guest id: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_accepts_both_item_shapes() {
        let body: MergeRequest = serde_json::from_str(
            r#"{"userId": 3, "items": [{"productId": 7}, {"productId": {"_id": 9, "title": "Mug"}}]}"#,
        )
        .unwrap();

        let ids: Vec<ProductId> = body.items.iter().map(|i| i.product_id.id()).collect();
        assert_eq!(ids, vec![ProductId::new(7), ProductId::new(9)]);
    }

    #[test]
    fn test_toggle_rejects_unknown_fields() {
        let parsed = serde_json::from_str::<ToggleRequest>(r#"{"productId": 1, "color": "red"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_guest_id() {
        assert!(parse_guest_id("0b6f-guest_1").is_ok());
        assert!(matches!(
            parse_guest_id("not a guest id"),
            Err(AppError::BadRequest(_))
        ));
    }
}
