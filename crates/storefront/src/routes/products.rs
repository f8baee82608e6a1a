//! Public catalog route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use bazaar_core::ProductId;

use crate::error::{AppError, Result};
use crate::extract::{ApiPath, ApiQuery};
use crate::models::{Product, ProductFilter};
use crate::response::{self, DataBody};
use crate::services::ProductService;
use crate::state::AppState;

/// Query parameters for the shop listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub sort_by: Option<String>,
}

/// List products, filtered and sorted.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<DataBody<Vec<Product>>>> {
    let filter = ProductFilter::from_query(
        query.category.as_deref(),
        query.brand.as_deref(),
        query.sort_by.as_deref(),
    )
    .map_err(AppError::BadRequest)?;

    let products = ProductService::new(state.pool())
        .list_filtered(&filter)
        .await?;
    Ok(response::data(products))
}

/// One product.
pub async fn details(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<DataBody<Product>>> {
    let product = ProductService::new(state.pool()).details(id).await?;
    Ok(response::data(product))
}
