//! RealtimeHub - WebSocket Distribution
//!
//! ## Responsibilities
//!
//! - Fan out dashboard messages to every connected browser
//! - Render the map by broadcast: the hub implements
//!   [`MapRenderer`], so marker operations ARE dashboard messages
//!
//! Note: the hub only ships marker/view/stat deltas. A dashboard that
//! connects late resyncs via HTTP (`GET /api/cameras`, `GET /api/markers`)
//! before applying the stream.

use crate::activity_feed::{ActivityItem, ActivityKind};
use crate::map_renderer::{MapRenderer, MapView, MarkerHandle, MarkerSpec};
use crate::marker_registry::FilterMode;
use crate::violation_monitor::ViolationStats;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Hub message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum HubMessage {
    /// A marker was created during a refresh rebuild
    MarkerAdded(MarkerAddedMessage),
    /// Marker detached by the filter (dashboard removes the layer)
    MarkerRemoved(MarkerHandleMessage),
    /// Previously detached marker re-added by the filter
    MarkerRestored(MarkerHandleMessage),
    MarkerOpacity(MarkerOpacityMessage),
    /// Viewport move (city fly-to)
    ViewChanged(MapView),
    /// Total loaded cameras, drives the summary counter
    CameraCount(CameraCountMessage),
    /// Active filter; the dashboard highlights the matching control
    /// and clears the rest (mutually exclusive single-select)
    FilterChanged(FilterChangedMessage),
    Activity(ActivityItem),
    /// Violation notification with spoken-alert text
    ViolationAlert(AlertMessage),
    StatsUpdate(ViolationStats),
}

/// Marker added message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerAddedMessage {
    pub handle: MarkerHandle,
    pub marker: MarkerSpec,
}

/// Marker removed/restored message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerHandleMessage {
    pub handle: MarkerHandle,
}

/// Marker opacity message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerOpacityMessage {
    pub handle: MarkerHandle,
    pub opacity: f64,
}

/// Camera count message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraCountMessage {
    pub total: usize,
}

/// Filter indicator message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterChangedMessage {
    pub mode: FilterMode,
}

/// Notification message; `speech` feeds the browser's speech synthesis
/// when voice alerts are enabled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertMessage {
    pub kind: ActivityKind,
    pub message: String,
    pub speech: String,
}

/// RealtimeHub instance
pub struct RealtimeHub {
    tx: broadcast::Sender<String>,
    next_handle: AtomicU64,
}

impl RealtimeHub {
    /// Create new RealtimeHub
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            tx,
            next_handle: AtomicU64::new(0),
        }
    }

    /// Subscribe a new dashboard connection
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Broadcast message to all connected dashboards
    pub fn broadcast(&self, message: HubMessage) {
        let json = match serde_json::to_string(&message) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize hub message");
                return;
            }
        };

        if self.tx.send(json).is_err() {
            tracing::trace!("No dashboards connected, message dropped");
        }
    }

    /// Get connection count
    pub fn connection_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl MapRenderer for RealtimeHub {
    fn add_marker(&self, spec: &MarkerSpec) -> MarkerHandle {
        let handle = MarkerHandle(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        self.broadcast(HubMessage::MarkerAdded(MarkerAddedMessage {
            handle,
            marker: spec.clone(),
        }));
        handle
    }

    fn remove_marker(&self, handle: MarkerHandle) {
        self.broadcast(HubMessage::MarkerRemoved(MarkerHandleMessage { handle }));
    }

    fn attach_marker(&self, handle: MarkerHandle) {
        self.broadcast(HubMessage::MarkerRestored(MarkerHandleMessage { handle }));
    }

    fn set_opacity(&self, handle: MarkerHandle, opacity: f64) {
        self.broadcast(HubMessage::MarkerOpacity(MarkerOpacityMessage {
            handle,
            opacity,
        }));
    }

    fn set_view(&self, view: &MapView) {
        self.broadcast(HubMessage::ViewChanged(*view));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_renderer::{MarkerIcon, PopupInfo};
    use crate::marker_registry::CameraStatus;

    fn spec(camera_id: u64) -> MarkerSpec {
        MarkerSpec {
            camera_id,
            lat: 31.5,
            lng: 74.3,
            icon: MarkerIcon::Active,
            popup: PopupInfo {
                label: "Mall Road".to_string(),
                status: CameraStatus::Active,
                light_status: "green".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_marker_add_broadcasts_tagged_message() {
        let hub = RealtimeHub::new();
        let mut rx = hub.subscribe();

        let handle = hub.add_marker(&spec(7));
        assert_eq!(handle, MarkerHandle(1));

        let raw = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["type"], "marker_added");
        assert_eq!(value["data"]["marker"]["camera_id"], 7);
    }

    #[tokio::test]
    async fn test_handles_are_monotonic() {
        let hub = RealtimeHub::new();
        let a = hub.add_marker(&spec(1));
        let b = hub.add_marker(&spec(2));
        assert!(b.0 > a.0);
    }

    #[tokio::test]
    async fn test_broadcast_without_receivers_is_silent() {
        let hub = RealtimeHub::new();
        // No subscribers; must not panic or error
        hub.remove_marker(MarkerHandle(1));
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_hub_message_roundtrip() {
        let message = HubMessage::CameraCount(CameraCountMessage { total: 3 });
        let json = serde_json::to_string(&message).unwrap();
        let back: HubMessage = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, HubMessage::CameraCount(m) if m.total == 3));
    }
}
