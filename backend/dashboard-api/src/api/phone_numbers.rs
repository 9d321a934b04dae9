use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::StatusToggle;
use crate::error::{AppError, Result};
use crate::models::{NewPhoneNumber, PhoneNumber, PhoneNumberChanges, PhoneSummary};
use crate::services::{AuthService, PhoneNumberService};
use crate::utils::parse_id;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_phone_numbers).post(create_phone_number))
        .route("/authenticate", post(authenticate_phone_number))
        .route(
            "/:id",
            get(get_phone_number)
                .patch(update_phone_number)
                .delete(delete_phone_number),
        )
        .route("/:id/status", post(set_phone_number_status))
}

async fn list_phone_numbers(State(state): State<AppState>) -> Result<Json<Vec<PhoneNumber>>> {
    let phones = PhoneNumberService::new(state.db.clone()).list().await?;
    Ok(Json(phones))
}

async fn create_phone_number(
    State(state): State<AppState>,
    Json(payload): Json<NewPhoneNumber>,
) -> Result<Json<PhoneNumber>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let phone = PhoneNumberService::new(state.db.clone()).create(payload).await?;
    Ok(Json(phone))
}

async fn get_phone_number(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PhoneNumber>> {
    let phone_id = parse_id(&id, "phone number")?;
    let phone = PhoneNumberService::new(state.db.clone()).get(phone_id).await?;
    Ok(Json(phone))
}

async fn update_phone_number(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PhoneNumberChanges>,
) -> Result<Json<PhoneNumber>> {
    let phone_id = parse_id(&id, "phone number")?;
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let phone = PhoneNumberService::new(state.db.clone())
        .update(phone_id, payload)
        .await?;
    Ok(Json(phone))
}

async fn delete_phone_number(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let phone_id = parse_id(&id, "phone number")?;
    PhoneNumberService::new(state.db.clone()).delete(phone_id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

async fn set_phone_number_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusToggle>,
) -> Result<Json<PhoneNumber>> {
    let phone_id = parse_id(&id, "phone number")?;
    let phone = PhoneNumberService::new(state.db.clone())
        .set_active(phone_id, payload.active)
        .await?;
    Ok(Json(phone))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    pub token: String,
    pub expires_at: String,
    pub phone: PhoneSummary,
}

/// Lets dashboard operators try the phone-side login flow.
async fn authenticate_phone_number(
    State(state): State<AppState>,
    Json(payload): Json<AuthenticateRequest>,
) -> Result<Json<AuthenticateResponse>> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let result = AuthService::new(state.db.clone(), state.keys.clone())
        .authenticate_phone(&payload.phone_number, &payload.password)
        .await?;

    Ok(Json(AuthenticateResponse {
        token: result.token,
        expires_at: result.expires_at.to_rfc3339(),
        phone: result.phone,
    }))
}
