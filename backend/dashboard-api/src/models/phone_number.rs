use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub id: Uuid,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPhoneNumber {
    #[validate(length(min = 1, max = 64))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Fields a caller may change on a phone number.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhoneNumberChanges {
    #[validate(length(min = 1, max = 64))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1))]
    pub password: Option<String>,
    pub active: Option<bool>,
}

/// Storage-level patch; the password is already hashed.
#[derive(Debug, Default, Clone)]
pub struct PhoneNumberUpdate {
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
    pub active: Option<bool>,
}

/// What a phone caller learns about itself after authenticating.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneSummary {
    pub id: Uuid,
    pub phone_number: String,
}

impl From<&PhoneNumber> for PhoneSummary {
    fn from(phone: &PhoneNumber) -> Self {
        Self {
            id: phone.id,
            phone_number: phone.phone_number.clone(),
        }
    }
}
