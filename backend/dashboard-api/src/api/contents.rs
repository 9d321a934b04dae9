use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{ContentChanges, ContentDetail, ContentMedia, MediaChanges, NewContent, NewMedia};
use crate::services::ContentService;
use crate::utils::parse_id;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contents).post(create_content))
        .route("/:id", get(get_content).patch(update_content).delete(delete_content))
        .route("/:id/media", post(add_media))
        .route("/media/:media_id", patch(update_media).delete(delete_media))
}

async fn list_contents(State(state): State<AppState>) -> Result<Json<Vec<ContentDetail>>> {
    let contents = ContentService::new(state.db.clone()).list().await?;
    Ok(Json(contents))
}

async fn create_content(
    State(state): State<AppState>,
    Json(payload): Json<NewContent>,
) -> Result<Json<ContentDetail>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let content = ContentService::new(state.db.clone()).create(payload).await?;
    Ok(Json(content))
}

async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContentDetail>> {
    let content_id = parse_id(&id, "content")?;
    let content = ContentService::new(state.db.clone()).get(content_id).await?;
    Ok(Json(content))
}

async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ContentChanges>,
) -> Result<Json<ContentDetail>> {
    let content_id = parse_id(&id, "content")?;
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let content = ContentService::new(state.db.clone())
        .update(content_id, payload)
        .await?;
    Ok(Json(content))
}

async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let content_id = parse_id(&id, "content")?;
    ContentService::new(state.db.clone()).delete(content_id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

async fn add_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewMedia>,
) -> Result<Json<ContentMedia>> {
    let content_id = parse_id(&id, "content")?;
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let media = ContentService::new(state.db.clone())
        .add_media(content_id, payload)
        .await?;
    Ok(Json(media))
}

async fn update_media(
    State(state): State<AppState>,
    Path(media_id): Path<String>,
    Json(payload): Json<MediaChanges>,
) -> Result<Json<ContentMedia>> {
    let media_id = parse_id(&media_id, "media")?;
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let media = ContentService::new(state.db.clone())
        .update_media(media_id, payload)
        .await?;
    Ok(Json(media))
}

async fn delete_media(
    State(state): State<AppState>,
    Path(media_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let media_id = parse_id(&media_id, "media")?;
    ContentService::new(state.db.clone()).delete_media(media_id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
