use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::models::{NewPhoneAppRel, PhoneAppRel, PhoneAppRelChanges};
use crate::services::PhoneAppRelService;
use crate::utils::parse_id;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rels).post(create_rel))
        .route("/:id", get(get_rel).patch(update_rel).delete(delete_rel))
}

async fn list_rels(State(state): State<AppState>) -> Result<Json<Vec<PhoneAppRel>>> {
    let rels = PhoneAppRelService::new(state.db.clone()).list().await?;
    Ok(Json(rels))
}

async fn create_rel(
    State(state): State<AppState>,
    Json(payload): Json<NewPhoneAppRel>,
) -> Result<Json<PhoneAppRel>> {
    let rel = PhoneAppRelService::new(state.db.clone()).create(payload).await?;
    Ok(Json(rel))
}

async fn get_rel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PhoneAppRel>> {
    let rel_id = parse_id(&id, "phone app relation")?;
    let rel = PhoneAppRelService::new(state.db.clone()).get(rel_id).await?;
    Ok(Json(rel))
}

async fn update_rel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PhoneAppRelChanges>,
) -> Result<Json<PhoneAppRel>> {
    let rel_id = parse_id(&id, "phone app relation")?;
    let rel = PhoneAppRelService::new(state.db.clone())
        .update(rel_id, payload)
        .await?;
    Ok(Json(rel))
}

async fn delete_rel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let rel_id = parse_id(&id, "phone app relation")?;
    PhoneAppRelService::new(state.db.clone()).delete(rel_id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
