use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Entity families a create or update may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    PhoneNumber,
    App,
    Product,
    Content,
    Post,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::PhoneNumber => "PhoneNumber",
            EntityKind::App => "App",
            EntityKind::Product => "Product",
            EntityKind::Content => "Content",
            EntityKind::Post => "Post",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Referenced {0} not found")]
    ReferenceNotFound(EntityKind),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Invalid format for filter '{0}'")]
    InvalidFilterFormat(String),

    #[error("Invalid date for '{0}'")]
    InvalidDate(String),

    #[error("from_date cannot be after end_date")]
    InvalidRange,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),
            AppError::AuthenticationFailed => {
                (StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED", self.to_string())
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::ReferenceNotFound(_) => {
                (StatusCode::NOT_FOUND, "REFERENCE_NOT_FOUND", self.to_string())
            }
            AppError::DuplicateKey(msg) => (StatusCode::CONFLICT, "DUPLICATE_KEY", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InvalidFilterFormat(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_FILTER_FORMAT", self.to_string())
            }
            AppError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "INVALID_DATE", self.to_string()),
            AppError::InvalidRange => (StatusCode::BAD_REQUEST, "INVALID_RANGE", self.to_string()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", "Database error occurred".to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::AuthenticationFailed, StatusCode::UNAUTHORIZED),
            (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AppError::ReferenceNotFound(EntityKind::App), StatusCode::NOT_FOUND),
            (AppError::DuplicateKey("phone".into()), StatusCode::CONFLICT),
            (AppError::Conflict("in use".into()), StatusCode::CONFLICT),
            (AppError::InvalidFilterFormat("content_uuid".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidDate("from_date".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidRange, StatusCode::BAD_REQUEST),
            (AppError::Internal(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_reference_message_names_entity() {
        let error = AppError::ReferenceNotFound(EntityKind::App);
        assert_eq!(error.to_string(), "Referenced App not found");
    }
}
