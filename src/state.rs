//! Application state
//!
//! Holds all shared components and state

use crate::activity_feed::ActivityFeed;
use crate::camera_source::CameraSourceClient;
use crate::marker_registry::MarkerRegistry;
use crate::realtime_hub::RealtimeHub;
use crate::violation_monitor::ViolationMonitor;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera data source base URL
    pub camera_api_url: String,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Static dashboard directory
    pub static_dir: String,
    /// Camera fetch timeout in seconds
    pub fetch_timeout_sec: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_api_url: std::env::var("CAMERA_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "frontend".to_string()),
            fetch_timeout_sec: std::env::var("FETCH_TIMEOUT_SEC")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(10),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Camera data source adapter
    pub camera_source: Arc<CameraSourceClient>,
    /// Camera marker registry (SSoT)
    pub registry: Arc<MarkerRegistry>,
    /// RealtimeHub (WebSocket dashboards)
    pub realtime: Arc<RealtimeHub>,
    /// Dashboard activity feed
    pub activity: Arc<ActivityFeed>,
    /// Challan statistics + prediction classification
    pub violations: Arc<ViolationMonitor>,
}
