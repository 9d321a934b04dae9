use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::nullable;

pub const DEFAULT_POST_TYPE: &str = "post";

/// One publish attempt of a content by a phone to an app.
///
/// `status` is terminal: `true` published, `false` failed. There is no
/// pending state in storage.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub phone_number_id: Uuid,
    pub content_id: Uuid,
    pub app_id: Uuid,
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub post_type: String,
    pub status: bool,
    pub fail_reason: Option<String>,
    pub request_ip: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Immutable audit record written on post creation and on every status change.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLog {
    pub id: Uuid,
    pub post_id: Uuid,
    pub request_ip: Option<String>,
    pub user_id: Option<Uuid>,
    pub status: bool,
    pub fail_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Who is writing: recorded on the post and on every log entry.
#[derive(Debug, Clone, Default)]
pub struct PostActor {
    pub request_ip: Option<String>,
    pub user_id: Option<Uuid>,
}

impl PostLog {
    /// Snapshot of `post` as it stands after a write.
    pub fn record(post: &Post, actor: &PostActor) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id: post.id,
            request_ip: actor.request_ip.clone(),
            user_id: actor.user_id,
            status: post.status,
            fail_reason: post.fail_reason.clone(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub phone_number_id: Uuid,
    pub content_id: Uuid,
    pub app_id: Uuid,
    pub product_id: Uuid,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64))]
    pub post_type: Option<String>,
    pub status: Option<bool>,
    pub fail_reason: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostChanges {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64))]
    pub post_type: Option<String>,
    pub status: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub fail_reason: Option<Option<String>>,
}

impl PostChanges {
    pub fn touches_status(&self) -> bool {
        self.status.is_some() || self.fail_reason.is_some()
    }

    pub fn apply(&self, post: &mut Post) {
        if let Some(post_type) = &self.post_type {
            post.post_type = post_type.clone();
        }
        if let Some(status) = self.status {
            post.status = status;
        }
        if let Some(fail_reason) = &self.fail_reason {
            post.fail_reason = fail_reason.clone();
        }
    }
}

/// Validated post-history filters; `None` leaves a dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostHistoryQuery {
    pub content_id: Option<Uuid>,
    /// Matches posts whose content owns this media item
    pub media_id: Option<Uuid>,
    pub phone_id: Option<Uuid>,
    pub app_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub request_ip: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostLogQuery {
    pub post_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub request_ip: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}
