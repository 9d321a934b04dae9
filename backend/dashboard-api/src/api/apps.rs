use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use super::StatusToggle;
use crate::error::{AppError, Result};
use crate::models::{App, AppChanges, NewApp, Product};
use crate::services::AppService;
use crate::utils::parse_id;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_apps).post(create_app))
        .route("/:id", get(get_app).patch(update_app).delete(delete_app))
        .route("/:id/status", post(set_app_status))
        .route("/:id/products", get(list_app_products))
}

async fn list_apps(State(state): State<AppState>) -> Result<Json<Vec<App>>> {
    let apps = AppService::new(state.db.clone()).list().await?;
    Ok(Json(apps))
}

async fn create_app(
    State(state): State<AppState>,
    Json(payload): Json<NewApp>,
) -> Result<Json<App>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let app = AppService::new(state.db.clone()).create(payload).await?;
    Ok(Json(app))
}

async fn get_app(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<App>> {
    let app_id = parse_id(&id, "app")?;
    let app = AppService::new(state.db.clone()).get(app_id).await?;
    Ok(Json(app))
}

async fn update_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AppChanges>,
) -> Result<Json<App>> {
    let app_id = parse_id(&id, "app")?;
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let app = AppService::new(state.db.clone()).update(app_id, payload).await?;
    Ok(Json(app))
}

async fn delete_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let app_id = parse_id(&id, "app")?;
    AppService::new(state.db.clone()).delete(app_id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

async fn set_app_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusToggle>,
) -> Result<Json<App>> {
    let app_id = parse_id(&id, "app")?;
    let app = AppService::new(state.db.clone())
        .set_active(app_id, payload.active)
        .await?;
    Ok(Json(app))
}

async fn list_app_products(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let app_id = parse_id(&id, "app")?;
    let products = AppService::new(state.db.clone()).products(app_id).await?;
    Ok(Json(products))
}
