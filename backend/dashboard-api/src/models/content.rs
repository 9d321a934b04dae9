use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::nullable;

pub const MEDIA_TYPE_URL: &str = "url";

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Uuid,
    pub content_name: String,
    pub created_at: DateTime<Utc>,
}

/// A media item attached to a content; lives and dies with it.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMedia {
    pub id: Uuid,
    pub content_id: Uuid,
    pub media_type: String,
    pub media_url: String,
    #[sqlx(rename = "sort_order")]
    pub order: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Product and app ids a content is linked to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRelations {
    pub product_ids: Vec<Uuid>,
    pub app_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetail {
    #[serde(flatten)]
    pub content: Content,
    #[serde(flatten)]
    pub relations: ContentRelations,
    pub media: Vec<ContentMedia>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewContent {
    #[validate(length(min = 1))]
    pub content_name: String,
    #[serde(default)]
    pub product_ids: Vec<Uuid>,
    #[serde(default)]
    pub app_ids: Vec<Uuid>,
}

/// Relation lists, when present, replace the stored sets.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContentChanges {
    #[validate(length(min = 1))]
    pub content_name: Option<String>,
    pub product_ids: Option<Vec<Uuid>>,
    pub app_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMedia {
    #[validate(length(min = 1, max = 32))]
    pub media_type: String,
    #[validate(length(min = 1))]
    pub media_url: String,
    pub order: Option<i32>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MediaChanges {
    #[validate(length(min = 1, max = 32))]
    pub media_type: Option<String>,
    #[validate(length(min = 1))]
    pub media_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub order: Option<Option<i32>>,
}
