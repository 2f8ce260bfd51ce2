//! WebAPI - REST API Endpoints
//!
//! ## Responsibilities
//!
//! - HTTP entry points for the UI controls (refresh, filter, search,
//!   export, fly-to, predictions)
//! - WebSocket upgrade into the realtime hub

mod routes;

pub use routes::create_router;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::models::HealthResponse;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let source_ok = state.camera_source.health_check().await.unwrap_or(false);

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        camera_source_connected: source_ok,
        cameras_loaded: state.registry.camera_count().await,
        dashboards_connected: state.realtime.connection_count(),
    };

    Json(response)
}

/// Service status endpoint
pub async fn service_status(State(_state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": "challan-map",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
