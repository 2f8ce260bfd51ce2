//! MarkerRegistry Type Definitions

use crate::map_renderer::{MarkerHandle, MarkerIcon};
use serde::{Deserialize, Serialize};

/// Fully visible marker
pub const OPACITY_VISIBLE: f64 = 1.0;

/// Search non-match (dimmed, still on the map)
pub const OPACITY_DIMMED: f64 = 0.2;

/// Filter non-member (hidden and detached)
pub const OPACITY_HIDDEN: f64 = 0.0;

/// Speed limit assumed when the data source omits one (km/h)
pub const DEFAULT_SPEED_LIMIT: u32 = 60;

fn default_speed_limit() -> u32 {
    DEFAULT_SPEED_LIMIT
}

/// Camera operational status
///
/// The sole ground truth for icon choice and filter membership. Anything
/// the data source reports outside `active` is treated as inactive and
/// gets the warning pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    #[default]
    Active,
    #[serde(other)]
    Inactive,
}

impl CameraStatus {
    pub fn icon(&self) -> MarkerIcon {
        match self {
            Self::Active => MarkerIcon::Active,
            Self::Inactive => MarkerIcon::Inactive,
        }
    }
}

impl std::fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// One traffic camera as reported by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// Identity key, stable across refreshes
    pub id: u64,

    pub lat: f64,
    pub lng: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub status: CameraStatus,

    /// Traffic light color name (free text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_status: Option<String>,

    /// km/h
    #[serde(default = "default_speed_limit")]
    pub speed_limit: u32,
}

impl CameraRecord {
    /// Display label: address, falling back to location
    pub fn label(&self) -> &str {
        self.address
            .as_deref()
            .or(self.location.as_deref())
            .unwrap_or("")
    }

    /// Light color for display, "unknown" when absent
    pub fn light_status_display(&self) -> &str {
        self.light_status.as_deref().unwrap_or("unknown")
    }

    /// Search predicate: case-insensitive substring of the label, or of
    /// the id rendered as a decimal string. Expects a lowercased query;
    /// the empty query matches everything.
    pub fn matches_query(&self, query_lower: &str) -> bool {
        self.label().to_lowercase().contains(query_lower)
            || self.id.to_string().contains(query_lower)
    }
}

/// Camera-status subset currently shown on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Inactive,
}

impl FilterMode {
    /// Parse the UI control strings, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Whether a camera of the given status is a member of this subset
    pub fn admits(&self, status: CameraStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == CameraStatus::Active,
            Self::Inactive => status == CameraStatus::Inactive,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// One visual marker bound to exactly one loaded camera
///
/// Rebuilt wholesale on every successful refresh; index-aligned with the
/// registry's camera list.
#[derive(Debug, Clone)]
pub struct MarkerEntry {
    /// Renderer-issued handle
    pub handle: MarkerHandle,
    /// Back-reference to the source camera
    pub camera_id: u64,
    /// Visibility channel: 1.0 full, 0.2 search-dimmed, 0.0 filter-hidden
    pub opacity: f64,
    /// Whether the renderer currently presents this marker
    pub attached: bool,
}

/// Serializable marker visibility view (dashboard resync, tests)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerState {
    pub camera_id: u64,
    pub opacity: f64,
    pub attached: bool,
}

impl From<&MarkerEntry> for MarkerState {
    fn from(entry: &MarkerEntry) -> Self {
        Self {
            camera_id: entry.camera_id,
            opacity: entry.opacity,
            attached: entry.attached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_active_when_absent() {
        let cam: CameraRecord = serde_json::from_str(r#"{"id":1,"lat":31.5,"lng":74.3}"#).unwrap();
        assert_eq!(cam.status, CameraStatus::Active);
        assert_eq!(cam.speed_limit, DEFAULT_SPEED_LIMIT);
        assert!(cam.address.is_none());
    }

    #[test]
    fn test_unknown_status_reads_as_inactive() {
        let cam: CameraRecord =
            serde_json::from_str(r#"{"id":2,"lat":0.0,"lng":0.0,"status":"maintenance"}"#).unwrap();
        assert_eq!(cam.status, CameraStatus::Inactive);
        assert_eq!(cam.status.icon(), crate::map_renderer::MarkerIcon::Inactive);
    }

    #[test]
    fn test_label_falls_back_to_location() {
        let cam: CameraRecord = serde_json::from_str(
            r#"{"id":3,"lat":0.0,"lng":0.0,"location":"Liberty Market"}"#,
        )
        .unwrap();
        assert_eq!(cam.label(), "Liberty Market");

        let cam: CameraRecord = serde_json::from_str(
            r#"{"id":3,"lat":0.0,"lng":0.0,"address":"Mall Road","location":"Liberty Market"}"#,
        )
        .unwrap();
        assert_eq!(cam.label(), "Mall Road");
    }

    #[test]
    fn test_matches_query_label_and_id() {
        let cam: CameraRecord = serde_json::from_str(
            r#"{"id":42,"lat":0.0,"lng":0.0,"address":"Mall Road","status":"active"}"#,
        )
        .unwrap();
        assert!(cam.matches_query("mall"));
        assert!(cam.matches_query("42"));
        assert!(cam.matches_query("4"));
        assert!(cam.matches_query(""));
        assert!(!cam.matches_query("jail"));
    }

    #[test]
    fn test_filter_mode_parse() {
        assert_eq!(FilterMode::parse("all"), Some(FilterMode::All));
        assert_eq!(FilterMode::parse("Active"), Some(FilterMode::Active));
        assert_eq!(FilterMode::parse("INACTIVE"), Some(FilterMode::Inactive));
        assert_eq!(FilterMode::parse("broken"), None);
    }

    #[test]
    fn test_filter_mode_admits() {
        assert!(FilterMode::All.admits(CameraStatus::Active));
        assert!(FilterMode::All.admits(CameraStatus::Inactive));
        assert!(FilterMode::Active.admits(CameraStatus::Active));
        assert!(!FilterMode::Active.admits(CameraStatus::Inactive));
        assert!(!FilterMode::Inactive.admits(CameraStatus::Active));
    }
}
