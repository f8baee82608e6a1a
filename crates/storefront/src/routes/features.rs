//! Feature image route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAdmin;
use crate::models::FeatureImage;
use crate::response::{self, DataBody};
use crate::services::FeatureService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddFeatureRequest {
    #[serde(default)]
    pub image: String,
}

pub async fn add(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiJson(body): ApiJson<AddFeatureRequest>,
) -> Result<(StatusCode, Json<DataBody<FeatureImage>>)> {
    let feature = FeatureService::new(state.pool()).add(&body.image).await?;
    Ok((StatusCode::CREATED, response::data(feature)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<DataBody<Vec<FeatureImage>>>> {
    let features = FeatureService::new(state.pool()).list().await?;
    Ok(response::data(features))
}
