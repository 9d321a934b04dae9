pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::db::Database;
use crate::services::AuthKeys;

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub keys: Arc<AuthKeys>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> anyhow::Result<Self> {
        let keys = AuthKeys::from_config(&config)?;
        Ok(Self {
            db,
            config,
            keys: Arc::new(keys),
        })
    }
}

pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let origin = HeaderValue::from_str(&state.config.server.cors_origin)?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api::internal_routes(state.clone()))
        .merge(api::external_routes(state.clone()))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn health_check() -> &'static str {
    "OK"
}
