use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A social-media platform posts are published to.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: Uuid,
    pub app_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewApp {
    #[validate(length(min = 1, max = 255))]
    pub app_name: String,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppChanges {
    #[validate(length(min = 1, max = 255))]
    pub app_name: Option<String>,
    pub active: Option<bool>,
}
