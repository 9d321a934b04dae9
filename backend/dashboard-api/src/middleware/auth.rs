use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::AuthService;
use crate::AppState;

pub const SESSION_COOKIE: &str = "dashboard_session";

/// Dashboard user behind the session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// Phone behind the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentPhone {
    pub id: Uuid,
    pub phone_number: String,
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = CookieJar::from_headers(request.headers())
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AppError::Unauthorized)?;

    let claims = AuthService::new(state.db.clone(), state.keys.clone()).validate_session(&token)?;
    let id = claims.user_id().map_err(|_| AppError::InvalidToken)?;

    request.extensions_mut().insert(CurrentUser {
        id,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

/// Only `Bearer <token>` with a single space and nothing after the token.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Runs before any extractor, so a rejected request never has its body read.
pub async fn require_phone_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_bearer)
        .map(str::to_string)
        .ok_or_else(|| {
            tracing::warn!("Rejected external request without a bearer token");
            AppError::Unauthorized
        })?;

    let claims = AuthService::new(state.db.clone(), state.keys.clone()).validate_phone_token(&token)?;
    let id = claims.phone_id().map_err(|_| AppError::InvalidToken)?;

    request.extensions_mut().insert(CurrentPhone {
        id,
        phone_number: claims.phone_number,
    });

    Ok(next.run(request).await)
}
