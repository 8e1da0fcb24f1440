//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::assets::AssetLoader;
use crate::models::AppConfig;
use crate::services::CardService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub card_service: Arc<CardService>,
    pub config: Arc<AppConfig>,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    create_app_state_with_config(&asset_loader, config)
}

/// Create application state with an explicit configuration.
pub fn create_app_state_with_config(
    asset_loader: &AssetLoader,
    config: Arc<AppConfig>,
) -> anyhow::Result<AppState> {
    let card_service = CardService::from_config(asset_loader, &config)
        .map_err(|e| anyhow::anyhow!("Failed to create card service: {e}"))?;

    Ok(AppState {
        card_service: Arc::new(card_service),
        config,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// Cards are rendered per request and never cached by clients.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/card", post(api::handle_card))
        .route("/api/card/preview", post(api::handle_preview))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
