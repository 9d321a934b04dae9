use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{NewPost, Post, PostChanges, PostLog};
use crate::services::history::{HistoryFilters, PostLogHistoryFilters};
use crate::services::{PostActor, PostService};
use crate::utils::{client_ip, parse_id};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/history", get(post_history))
        .route("/by-app/:app_id", get(list_posts_by_app))
        .route("/by-phone/:phone_id", get(list_posts_by_phone))
        .route("/:id", get(get_post).patch(update_post).delete(delete_post))
        .route("/:id/status", post(update_post_status))
}

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_post_logs))
        .route("/history", get(post_log_history))
}

fn actor(
    headers: &HeaderMap,
    peer: Option<&ConnectInfo<SocketAddr>>,
    user: &CurrentUser,
) -> PostActor {
    PostActor {
        request_ip: client_ip(headers, peer),
        user_id: Some(user.id),
    }
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>> {
    let posts = PostService::new(state.db.clone()).list().await?;
    Ok(Json(posts))
}

async fn create_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(payload): Json<NewPost>,
) -> Result<Json<Post>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let post = PostService::new(state.db.clone())
        .create(payload, actor(&headers, peer.as_ref(), &current_user))
        .await?;
    Ok(Json(post))
}

async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Post>> {
    let post_id = parse_id(&id, "post")?;
    let post = PostService::new(state.db.clone()).get(post_id).await?;
    Ok(Json(post))
}

async fn update_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<PostChanges>,
) -> Result<Json<Post>> {
    let post_id = parse_id(&id, "post")?;
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let post = PostService::new(state.db.clone())
        .update(post_id, payload, actor(&headers, peer.as_ref(), &current_user))
        .await?;
    Ok(Json(post))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: bool,
    #[serde(default)]
    pub fail_reason: Option<String>,
}

async fn update_post_status(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<Post>> {
    let post_id = parse_id(&id, "post")?;

    let post = PostService::new(state.db.clone())
        .update_status(
            post_id,
            payload.status,
            payload.fail_reason,
            actor(&headers, peer.as_ref(), &current_user),
        )
        .await?;
    Ok(Json(post))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let post_id = parse_id(&id, "post")?;
    PostService::new(state.db.clone()).delete(post_id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

async fn list_posts_by_app(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
) -> Result<Json<Vec<Post>>> {
    let app_id = parse_id(&app_id, "app")?;
    let posts = PostService::new(state.db.clone()).list_by_app(app_id).await?;
    Ok(Json(posts))
}

async fn list_posts_by_phone(
    State(state): State<AppState>,
    Path(phone_id): Path<String>,
) -> Result<Json<Vec<Post>>> {
    let phone_id = parse_id(&phone_id, "phone number")?;
    let posts = PostService::new(state.db.clone())
        .list_by_phone(phone_id)
        .await?;
    Ok(Json(posts))
}

async fn post_history(
    State(state): State<AppState>,
    Query(filters): Query<HistoryFilters>,
) -> Result<Json<Vec<Post>>> {
    let posts = PostService::new(state.db.clone()).history(filters).await?;
    Ok(Json(posts))
}

async fn list_post_logs(State(state): State<AppState>) -> Result<Json<Vec<PostLog>>> {
    let logs = PostService::new(state.db.clone()).list_logs().await?;
    Ok(Json(logs))
}

async fn post_log_history(
    State(state): State<AppState>,
    Query(filters): Query<PostLogHistoryFilters>,
) -> Result<Json<Vec<PostLog>>> {
    let logs = PostService::new(state.db.clone()).log_history(filters).await?;
    Ok(Json(logs))
}
