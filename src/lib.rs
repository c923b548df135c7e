//! Opsboard — internal operations status dashboard.
//!
//! A REST backend with SQLite persistence for the two report documents, plus
//! the client-side editing workflow (table models, dirty tracking, save
//! orchestration) and the print renderer.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod editor;
pub mod errors;
pub mod models;
pub mod render;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the token for the auth layer
    let token = state.config.api_token.clone();

    // API routes
    let api_routes = Router::new()
        // Cloud report
        .route("/cloud-report/data", get(api::get_cloud_report))
        .route("/cloud-report/save", post(api::save_cloud_report))
        // Backup server report
        .route("/backup-server/data", get(api::get_backup_report))
        .route("/backup-server/save", post(api::save_backup_report))
        // Apply bearer auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::bearer_auth_layer(token.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
