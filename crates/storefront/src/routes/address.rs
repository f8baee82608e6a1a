//! Address book route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use bazaar_core::{AddressFields, AddressId, AddressPatch, UserId};

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{RequireAuth, ensure_owner};
use crate::models::Address;
use crate::response::{self, DataBody, MessageBody};
use crate::services::AddressService;
use crate::state::AppState;

/// Body of add-address. Missing fields are reported by name, not as a
/// parse error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddressRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub notes: String,
}

/// Add an address to the user's book.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiJson(body): ApiJson<NewAddressRequest>,
) -> Result<(StatusCode, Json<DataBody<Address>>)> {
    ensure_owner(&claims, body.user_id)?;

    let fields = AddressFields::new(
        &body.address,
        &body.city,
        &body.phone,
        &body.pincode,
        &body.notes,
    )?;
    let address = AddressService::new(state.pool())
        .add(body.user_id, &fields)
        .await?;

    Ok((StatusCode::CREATED, response::data(address)))
}

/// List the user's addresses.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<DataBody<Vec<Address>>>> {
    ensure_owner(&claims, user_id)?;

    let addresses = AddressService::new(state.pool()).list(user_id).await?;
    Ok(response::data(addresses))
}

/// Edit an address. Blank fields keep their stored value.
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiPath((user_id, address_id)): ApiPath<(UserId, AddressId)>,
    ApiJson(patch): ApiJson<AddressPatch>,
) -> Result<Json<DataBody<Address>>> {
    ensure_owner(&claims, user_id)?;

    let address = AddressService::new(state.pool())
        .edit(user_id, address_id, &patch)
        .await?;
    Ok(response::data(address))
}

/// Delete an address.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiPath((user_id, address_id)): ApiPath<(UserId, AddressId)>,
) -> Result<Json<MessageBody>> {
    ensure_owner(&claims, user_id)?;

    AddressService::new(state.pool())
        .delete(user_id, address_id)
        .await?;
    Ok(response::message("Address deleted successfully"))
}
