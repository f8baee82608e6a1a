//! Home page feature images.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::FeatureImageId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeatureImage {
    #[serde(rename = "_id")]
    pub id: FeatureImageId,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
