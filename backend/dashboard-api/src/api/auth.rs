use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, SESSION_COOKIE};
use crate::models::User;
use crate::services::{AuthService, UserService};
use crate::AppState;

/// Reachable without a session.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub expires_at: String,
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let auth_service = AuthService::new(state.db.clone(), state.keys.clone());
    let login = auth_service.login(&payload.username, &payload.password).await?;

    let cookie = Cookie::build((SESSION_COOKIE, login.session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session.secure_cookie)
        .build();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            user: login.user,
            expires_at: login.session.expires_at.to_rfc3339(),
        }),
    ))
}

async fn logout(
    jar: CookieJar,
    Extension(current_user): Extension<CurrentUser>,
) -> (CookieJar, Json<serde_json::Value>) {
    tracing::info!(user_id = %current_user.id, "Dashboard user logged out");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(serde_json::json!({ "success": true })))
}

async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<User>> {
    let user = UserService::new(state.db.clone())
        .get(current_user.id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized,
            other => other,
        })?;

    Ok(Json(user))
}
