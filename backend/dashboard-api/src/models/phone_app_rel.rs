use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Assignment of a phone to an app it publishes to.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneAppRel {
    pub id: Uuid,
    pub phone_id: Uuid,
    pub app_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhoneAppRel {
    pub phone_id: Uuid,
    pub app_id: Uuid,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhoneAppRelChanges {
    pub phone_id: Option<Uuid>,
    pub app_id: Option<Uuid>,
}
