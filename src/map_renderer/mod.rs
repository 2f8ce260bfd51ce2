//! MapRenderer - Map Surface Capability Trait
//!
//! ## Responsibilities
//!
//! - Marker add/remove/restore/opacity operations
//! - Viewport moves (city fly-to)
//!
//! The registry is polymorphic over anything implementing this capability
//! set. The shipped implementation is [`crate::realtime_hub::RealtimeHub`],
//! which renders by broadcasting the operations to connected Leaflet
//! dashboards. The camera id inside [`MarkerSpec`] doubles as the click
//! binding: a dashboard click on the marker fetches
//! `GET /api/cameras/{camera_id}` for the detail panel.

use crate::marker_registry::CameraStatus;
use serde::{Deserialize, Serialize};

/// Renderer-issued marker handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerHandle(pub u64);

/// Marker pin icon, chosen from camera status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerIcon {
    /// Green pin
    Active,
    /// Red warning pin
    Inactive,
}

/// Info popup summary shown on the marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopupInfo {
    /// Display label (address falling back to location)
    pub label: String,
    pub status: CameraStatus,
    /// Traffic light color name, "unknown" when the camera reports none
    pub light_status: String,
}

/// Everything the renderer needs to present one camera marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub camera_id: u64,
    pub lat: f64,
    pub lng: f64,
    pub icon: MarkerIcon,
    pub popup: PopupInfo,
}

/// Viewport position for fly-to moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

/// Map surface capability set
///
/// All methods are synchronous: filter and search runs must complete
/// without suspension so a half-applied pass is never observable.
pub trait MapRenderer: Send + Sync {
    /// Present a new marker, returning its handle
    fn add_marker(&self, spec: &MarkerSpec) -> MarkerHandle;

    /// Remove a marker from the surface (it no longer intercepts clicks)
    fn remove_marker(&self, handle: MarkerHandle);

    /// Re-present a previously removed marker
    fn attach_marker(&self, handle: MarkerHandle);

    /// Set marker opacity in [0, 1]
    fn set_opacity(&self, handle: MarkerHandle, opacity: f64);

    /// Move the viewport
    fn set_view(&self, view: &MapView);
}
