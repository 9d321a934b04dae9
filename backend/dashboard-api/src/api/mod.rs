mod apps;
mod auth;
mod contents;
mod external;
mod phone_app_rels;
mod phone_numbers;
mod posts;
mod products;

use axum::{middleware, Router};
use serde::Deserialize;

use crate::middleware::require_session;
use crate::AppState;

/// Body of the `/:id/status` toggles.
#[derive(Debug, Deserialize)]
pub struct StatusToggle {
    pub active: bool,
}

/// Dashboard routes, mounted under `/api/v1`. Only login is public.
pub fn internal_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(auth::session_routes())
        .nest("/apps", apps::routes())
        .nest("/products", products::routes())
        .nest("/contents", contents::routes())
        .nest("/phone-numbers", phone_numbers::routes())
        .nest("/phone-app-rels", phone_app_rels::routes())
        .nest("/posts", posts::routes())
        .nest("/post-logs", posts::log_routes())
        .route_layer(middleware::from_fn_with_state(state, require_session));

    Router::new().merge(auth::public_routes()).merge(protected)
}

/// Phone-facing routes, mounted at the root.
pub fn external_routes(state: AppState) -> Router<AppState> {
    external::routes(state)
}
