use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product, ProductChanges};
use crate::services::ProductService;
use crate::utils::parse_id;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).patch(update_product).delete(delete_product))
}

async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductService::new(state.db.clone()).list().await?;
    Ok(Json(products))
}

async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> Result<Json<Product>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let product = ProductService::new(state.db.clone()).create(payload).await?;
    Ok(Json(product))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product_id = parse_id(&id, "product")?;
    let product = ProductService::new(state.db.clone()).get(product_id).await?;
    Ok(Json(product))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductChanges>,
) -> Result<Json<Product>> {
    let product_id = parse_id(&id, "product")?;
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let product = ProductService::new(state.db.clone())
        .update(product_id, payload)
        .await?;
    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let product_id = parse_id(&id, "product")?;
    ProductService::new(state.db.clone()).delete(product_id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
