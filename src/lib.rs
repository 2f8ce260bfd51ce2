//! challan-map - Traffic Camera Map Dashboard Engine
//!
//! Server side of the e-challan traffic camera map dashboard.
//!
//! ## Components
//!
//! 1. MarkerRegistry - authoritative camera list + marker state (SSoT)
//! 2. CameraSourceClient - camera data source adapter (`GET /api/cameras`)
//! 3. MapRenderer - capability trait the registry drives markers through
//! 4. RealtimeHub - WebSocket distribution; renders markers by broadcast
//! 5. ActivityFeed - bounded dashboard activity feed
//! 6. ViolationMonitor - prediction classification + challan statistics
//! 7. WebAPI - REST entry points for the UI controls
//!
//! ## Design Principles
//!
//! - SSoT: the registry, not the renderer, owns camera/marker truth
//! - Fetch first, commit second: a failed refresh never touches state
//! - Presentation at the edges: classification and CSV rendering are pure

pub mod activity_feed;
pub mod camera_source;
pub mod city_presets;
pub mod error;
pub mod map_renderer;
pub mod marker_registry;
pub mod models;
pub mod realtime_hub;
pub mod report;
pub mod state;
pub mod violation_monitor;
pub mod web_api;

pub use error::{Error, Result};
pub use state::AppState;
