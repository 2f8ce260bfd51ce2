//! API Routes

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::marker_registry::{CameraRecord, FilterMode, MarkerState};
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::violation_monitor::PredictionDecision;
use crate::{city_presets, report};

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Status
        .route("/healthz", get(super::health_check))
        .route("/api/status", get(super::service_status))
        // Cameras & markers
        .route("/api/cameras", get(list_cameras))
        .route("/api/cameras/:id", get(camera_details))
        .route("/api/markers", get(marker_states))
        .route("/api/refresh", post(refresh_cameras))
        // Map queries
        .route("/api/filter", post(filter_cameras))
        .route("/api/search", post(search_cameras))
        .route("/api/map/fly-to", post(fly_to_city))
        // Report export
        .route("/api/report.csv", get(export_report))
        // Violations
        .route("/api/predictions", post(submit_prediction))
        .route("/api/stats", get(violation_stats))
        // Activity feed
        .route("/api/activity", get(activity_feed))
        // WebSocket
        .route("/api/ws", get(websocket_handler))
        .with_state(state)
}

// ========================================
// Camera Handlers
// ========================================

async fn list_cameras(State(state): State<AppState>) -> Json<ApiResponse<Vec<CameraRecord>>> {
    let cameras = state.registry.cameras().await;
    Json(ApiResponse::success(cameras))
}

/// Detail panel payload; uptime/violations/maintenance are simulated
/// readings, as the dashboard mocks them
#[derive(Debug, Serialize)]
struct CameraDetails {
    camera: CameraRecord,
    uptime_hours: u32,
    violations_today: u32,
    last_maintenance: String,
}

async fn camera_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<CameraDetails>>> {
    let camera = state
        .registry
        .camera_by_id(id)
        .await
        .ok_or_else(|| Error::NotFound(format!("camera {}", id)))?;

    let mut rng = rand::thread_rng();
    let details = CameraDetails {
        camera,
        uptime_hours: rng.gen_range(1..=24),
        violations_today: rng.gen_range(0..50),
        last_maintenance: (Utc::now() - chrono::Duration::days(rng.gen_range(1..120i64)))
            .date_naive()
            .to_string(),
    };

    Ok(Json(ApiResponse::success(details)))
}

async fn marker_states(State(state): State<AppState>) -> Json<ApiResponse<Vec<MarkerState>>> {
    let markers = state.registry.marker_states().await;
    Json(ApiResponse::success(markers))
}

async fn refresh_cameras(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let total = state.registry.refresh(state.camera_source.as_ref()).await?;
    Ok(Json(ApiResponse::success(json!({ "total": total }))))
}

// ========================================
// Filter / Search / Fly-to Handlers
// ========================================

#[derive(Debug, Deserialize)]
struct FilterRequest {
    status: String,
}

async fn filter_cameras(
    State(state): State<AppState>,
    Json(req): Json<FilterRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let mode = FilterMode::parse(&req.status)
        .ok_or_else(|| Error::Validation(format!("unknown filter status: {}", req.status)))?;

    state.registry.filter_by_status(mode).await;
    Ok(Json(ApiResponse::success(json!({ "filter": mode }))))
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    query: String,
}

async fn search_cameras(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Json<ApiResponse<serde_json::Value>> {
    state.registry.search(&req.query).await;
    Json(ApiResponse::success(json!({ "query": req.query })))
}

#[derive(Debug, Deserialize)]
struct FlyToRequest {
    city: String,
}

async fn fly_to_city(
    State(state): State<AppState>,
    Json(req): Json<FlyToRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let view = city_presets::lookup(&req.city)
        .ok_or_else(|| Error::NotFound(format!("city preset {}", req.city)))?;

    state.registry.fly_to(&view).await;
    Ok(Json(ApiResponse::success(json!({
        "city": req.city,
        "view": view
    }))))
}

// ========================================
// Report Handler
// ========================================

async fn export_report(State(state): State<AppState>) -> impl IntoResponse {
    let csv = state.registry.export_report().await;
    let filename = report::report_filename(Utc::now().date_naive());

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
}

// ========================================
// Violation Handlers
// ========================================

#[derive(Debug, Deserialize)]
struct PredictionRequest {
    prediction: String,
}

async fn submit_prediction(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> Json<ApiResponse<PredictionDecision>> {
    let decision = state.violations.process_prediction(&req.prediction).await;
    Json(ApiResponse::success(decision))
}

async fn violation_stats(
    State(state): State<AppState>,
) -> Json<ApiResponse<crate::violation_monitor::ViolationStats>> {
    Json(ApiResponse::success(state.violations.stats().await))
}

// ========================================
// Activity Feed Handler
// ========================================

#[derive(Debug, Deserialize)]
struct ActivityQuery {
    count: Option<usize>,
}

async fn activity_feed(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Json<ApiResponse<Vec<crate::activity_feed::ActivityItem>>> {
    let items = state.activity.latest(query.count.unwrap_or(10)).await;
    Json(ApiResponse::success(items))
}

// ========================================
// WebSocket Handler
// ========================================

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.realtime.subscribe();
    let connection_id = Uuid::new_v4();

    tracing::info!(connection_id = %connection_id, "Dashboard connected");

    loop {
        tokio::select! {
            outgoing = rx.recv() => match outgoing {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        skipped,
                        "Dashboard receiver lagging, messages dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                // Client pings and control frames carry no commands
                Some(Ok(_)) => {}
                _ => break,
            },
        }
    }

    tracing::info!(connection_id = %connection_id, "Dashboard disconnected");
}
