//! Admin catalog route handlers.
//!
//! Every handler takes `RequireAdmin`, so shoppers get 403 before any body is
//! read.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use serde::Serialize;

use bazaar_core::ProductId;

use crate::cloudinary::UploadedImage;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdmin;
use crate::models::{NewProductRequest, Product, ProductPatchRequest};
use crate::response::{self, DataBody, MessageBody};
use crate::services::ProductService;
use crate::services::products::upload_image as store_image;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "my_file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub result: UploadedImage,
}

/// Upload a product image to the image host.
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAdmin(claims): RequireAdmin,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;
        let image = store_image(state.cloudinary(), &bytes, content_type.as_deref()).await?;

        tracing::info!(user_id = %claims.id, public_id = %image.public_id, "product image stored");
        return Ok(Json(UploadResponse {
            success: true,
            result: image,
        }));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// Create a product.
pub async fn add(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiJson(body): ApiJson<NewProductRequest>,
) -> Result<(StatusCode, Json<DataBody<Product>>)> {
    let product = ProductService::new(state.pool()).create(body).await?;
    Ok((StatusCode::CREATED, response::data(product)))
}

/// List every product.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<DataBody<Vec<Product>>>> {
    let products = ProductService::new(state.pool()).list_all().await?;
    Ok(response::data(products))
}

/// Edit a product.
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(patch): ApiJson<ProductPatchRequest>,
) -> Result<Json<DataBody<Product>>> {
    let product = ProductService::new(state.pool()).edit(id, &patch).await?;
    Ok(response::data(product))
}

/// Delete a product.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<MessageBody>> {
    ProductService::new(state.pool()).delete(id).await?;
    Ok(response::message("Product deleted successfully"))
}
