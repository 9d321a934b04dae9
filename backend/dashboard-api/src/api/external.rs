//! Phone-facing endpoints.
//!
//! Everything except `/phone/auth` sits behind [`require_phone_token`], which
//! rejects a request before its body is read.
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::HeaderMap,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{require_phone_token, CurrentPhone};
use crate::models::{ContentChanges, NewPhoneNumber, PhoneNumberChanges, PhoneSummary, Post};
use crate::services::history::HistoryFilters;
use crate::services::{AuthService, ContentService, PhoneNumberService, PostActor, PostService};
use crate::utils::{client_ip, parse_id};
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/admin/phone_number",
            post(create_phone_number)
                .delete(delete_phone_number)
                .patch(update_phone_number),
        )
        .route(
            "/admin/content",
            post(create_content).delete(delete_content).patch(update_content),
        )
        .route("/admin/post_history", get(post_history))
        .route("/phone/post", get(posts_for_app))
        .route("/phone/post/:post_uuid/status", post(update_post_status))
        .route_layer(middleware::from_fn_with_state(state, require_phone_token));

    Router::new()
        .route("/phone/auth", post(phone_auth))
        .merge(protected)
}

#[derive(Debug, Deserialize, Validate)]
pub struct PhoneAuthRequest {
    #[validate(length(min = 1))]
    pub number: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct PhoneAuthResponse {
    pub token: String,
    pub user: PhoneSummary,
}

async fn phone_auth(
    State(state): State<AppState>,
    Json(payload): Json<PhoneAuthRequest>,
) -> Result<Json<PhoneAuthResponse>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let result = AuthService::new(state.db.clone(), state.keys.clone())
        .authenticate_phone(&payload.number, &payload.password)
        .await?;

    Ok(Json(PhoneAuthResponse {
        token: result.token,
        user: result.phone,
    }))
}

async fn create_phone_number(
    State(state): State<AppState>,
    Json(payload): Json<NewPhoneNumber>,
) -> Result<Json<PhoneSummary>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let phone = PhoneNumberService::new(state.db.clone()).create(payload).await?;
    Ok(Json(PhoneSummary::from(&phone)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeletePhoneRequest {
    #[validate(length(min = 1))]
    pub phone_number: String,
}

async fn delete_phone_number(
    State(state): State<AppState>,
    Json(payload): Json<DeletePhoneRequest>,
) -> Result<Json<serde_json::Value>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    PhoneNumberService::new(state.db.clone())
        .delete_by_number(&payload.phone_number)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePhoneRequest {
    pub id: String,
    pub data: PhoneNumberChanges,
}

async fn update_phone_number(
    State(state): State<AppState>,
    Json(payload): Json<UpdatePhoneRequest>,
) -> Result<Json<serde_json::Value>> {
    let phone_id = parse_id(&payload.id, "phone number")?;
    payload.data.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    PhoneNumberService::new(state.db.clone())
        .update(phone_id, payload.data)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    #[validate(length(min = 1))]
    pub content: String,
    /// Stored as the url of the single media item.
    #[validate(length(min = 1))]
    pub media_uuid: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedContent {
    pub id: Uuid,
    pub content: String,
}

async fn create_content(
    State(state): State<AppState>,
    Extension(phone): Extension<CurrentPhone>,
    Json(payload): Json<CreateContentRequest>,
) -> Result<Json<CreatedContent>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let detail = ContentService::new(state.db.clone())
        .create_with_media_url(payload.content, payload.media_uuid)
        .await?;

    tracing::debug!(phone_id = %phone.id, content_id = %detail.content.id, "Phone created content");
    Ok(Json(CreatedContent {
        id: detail.content.id,
        content: detail.content.content_name,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContentRequest {
    pub content_uuid: String,
}

async fn delete_content(
    State(state): State<AppState>,
    Json(payload): Json<DeleteContentRequest>,
) -> Result<Json<serde_json::Value>> {
    let content_id = parse_id(&payload.content_uuid, "content")?;

    ContentService::new(state.db.clone()).delete(content_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentRequest {
    pub content_uuid: String,
    #[validate(length(min = 1))]
    pub new_content: String,
}

async fn update_content(
    State(state): State<AppState>,
    Json(payload): Json<UpdateContentRequest>,
) -> Result<Json<serde_json::Value>> {
    let content_id = parse_id(&payload.content_uuid, "content")?;
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let changes = ContentChanges {
        content_name: Some(payload.new_content),
        ..Default::default()
    };
    ContentService::new(state.db.clone())
        .update(content_id, changes)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct SocialMediaQuery {
    pub social_media_uuid: String,
}

async fn posts_for_app(
    State(state): State<AppState>,
    Query(query): Query<SocialMediaQuery>,
) -> Result<Json<Vec<Post>>> {
    let app_id = parse_id(&query.social_media_uuid, "app")?;

    let posts = PostService::new(state.db.clone()).list_by_app(app_id).await?;
    if posts.is_empty() {
        return Err(AppError::NotFound("No posts found".to_string()));
    }
    Ok(Json(posts))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStatusRequest {
    pub status: bool,
    #[serde(default)]
    pub fail_reason: Option<String>,
}

async fn update_post_status(
    State(state): State<AppState>,
    Extension(phone): Extension<CurrentPhone>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Path(post_uuid): Path<String>,
    Json(payload): Json<PostStatusRequest>,
) -> Result<Json<serde_json::Value>> {
    let post_id = parse_id(&post_uuid, "post")?;
    let actor = PostActor {
        request_ip: client_ip(&headers, peer.as_ref()),
        user_id: None,
    };

    PostService::new(state.db.clone())
        .update_status(post_id, payload.status, payload.fail_reason, actor)
        .await?;

    tracing::debug!(phone_id = %phone.id, post_id = %post_id, "Phone reported post status");
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Serialize)]
pub struct PostHistoryEntry {
    pub post_uuid: Uuid,
    pub status: bool,
    pub created_at: DateTime<Utc>,
}

async fn post_history(
    State(state): State<AppState>,
    Query(filters): Query<HistoryFilters>,
) -> Result<Json<Vec<PostHistoryEntry>>> {
    let posts = PostService::new(state.db.clone()).history(filters).await?;

    Ok(Json(
        posts
            .into_iter()
            .map(|post| PostHistoryEntry {
                post_uuid: post.id,
                status: post.status,
                created_at: post.created_at,
            })
            .collect(),
    ))
}
