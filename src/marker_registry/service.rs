//! Camera Marker Registry
//!
//! Owns the authoritative camera list and the marker entries bound to it.
//! Refresh replaces both wholesale; filter and search mutate marker
//! visibility; the renderer only ever sees a fully committed set.

use super::types::{
    CameraRecord, FilterMode, MarkerEntry, MarkerState, OPACITY_DIMMED, OPACITY_HIDDEN,
    OPACITY_VISIBLE,
};
use crate::camera_source::CameraFetch;
use crate::error::{Error, Result};
use crate::map_renderer::{MapRenderer, MapView, MarkerSpec, PopupInfo};
use crate::realtime_hub::{CameraCountMessage, FilterChangedMessage, HubMessage, RealtimeHub};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct RegistryState {
    cameras: Vec<CameraRecord>,
    markers: Vec<MarkerEntry>,
    filter: FilterMode,
    query: String,
    /// Sequence number of the last committed refresh (0 = never loaded)
    committed_seq: u64,
}

/// Camera Marker Registry instance
///
/// Interior mutability behind one RwLock: a refresh commit, a filter pass
/// and a search pass each hold the write guard for their whole run, so no
/// caller can observe a half-built list. The network fetch itself runs
/// before the guard is taken.
pub struct MarkerRegistry {
    renderer: Arc<dyn MapRenderer>,
    realtime: Arc<RealtimeHub>,
    state: RwLock<RegistryState>,
    /// Monotonic refresh sequence; claimed at fetch start
    refresh_seq: AtomicU64,
}

impl MarkerRegistry {
    /// Create a registry driving the given renderer
    pub fn new(renderer: Arc<dyn MapRenderer>, realtime: Arc<RealtimeHub>) -> Self {
        Self {
            renderer,
            realtime,
            state: RwLock::new(RegistryState::default()),
            refresh_seq: AtomicU64::new(0),
        }
    }

    /// Fetch the camera list and rebuild the marker set
    ///
    /// On success the camera and marker lists are swapped atomically, one
    /// marker per fetched camera, filter reset to `all` and the search
    /// query cleared; the new total is broadcast to dashboards. On any
    /// fetch failure the previous state is left untouched.
    ///
    /// Concurrent refreshes are sequenced last-started-wins: a completion
    /// whose fetch started before an already committed one is discarded
    /// whole and reported as [`Error::StaleRefresh`].
    pub async fn refresh<S: CameraFetch + Sync>(&self, source: &S) -> Result<usize> {
        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let cameras = match source.fetch_cameras().await {
            Ok(cameras) => cameras,
            Err(e) => {
                tracing::error!(error = %e, seq, "Camera fetch failed, keeping previous marker set");
                return Err(e);
            }
        };

        let mut state = self.state.write().await;
        if state.committed_seq >= seq {
            tracing::warn!(
                seq,
                committed_seq = state.committed_seq,
                "Discarding stale refresh response"
            );
            return Err(Error::StaleRefresh(format!(
                "refresh {} superseded by refresh {}",
                seq, state.committed_seq
            )));
        }

        for entry in state.markers.iter().filter(|m| m.attached) {
            self.renderer.remove_marker(entry.handle);
        }

        let mut markers = Vec::with_capacity(cameras.len());
        for cam in &cameras {
            let spec = MarkerSpec {
                camera_id: cam.id,
                lat: cam.lat,
                lng: cam.lng,
                icon: cam.status.icon(),
                popup: PopupInfo {
                    label: cam.label().to_string(),
                    status: cam.status,
                    light_status: cam.light_status_display().to_string(),
                },
            };
            let handle = self.renderer.add_marker(&spec);
            markers.push(MarkerEntry {
                handle,
                camera_id: cam.id,
                opacity: OPACITY_VISIBLE,
                attached: true,
            });
        }

        let total = cameras.len();
        state.cameras = cameras;
        state.markers = markers;
        state.filter = FilterMode::All;
        state.query.clear();
        state.committed_seq = seq;

        self.realtime
            .broadcast(HubMessage::CameraCount(CameraCountMessage { total }));
        tracing::info!(total, seq, "Camera marker set rebuilt");

        Ok(total)
    }

    /// Show only cameras of the given status
    ///
    /// Members become fully opaque and attached; non-members are zeroed
    /// and detached from the renderer so they neither intercept clicks
    /// nor appear in renderer-level counts. Idempotent.
    pub async fn filter_by_status(&self, mode: FilterMode) {
        let mut state = self.state.write().await;
        let state = &mut *state;

        for (cam, entry) in state.cameras.iter().zip(state.markers.iter_mut()) {
            if mode.admits(cam.status) {
                entry.opacity = OPACITY_VISIBLE;
                self.renderer.set_opacity(entry.handle, OPACITY_VISIBLE);
                if !entry.attached {
                    self.renderer.attach_marker(entry.handle);
                    entry.attached = true;
                }
            } else {
                entry.opacity = OPACITY_HIDDEN;
                self.renderer.set_opacity(entry.handle, OPACITY_HIDDEN);
                if entry.attached {
                    self.renderer.remove_marker(entry.handle);
                    entry.attached = false;
                }
            }
        }

        state.filter = mode;
        self.realtime
            .broadcast(HubMessage::FilterChanged(FilterChangedMessage { mode }));
        tracing::debug!(mode = %mode, "Status filter applied");
    }

    /// Dim cameras not matching the query
    ///
    /// Case-insensitive substring match on the display label or the
    /// decimal id; matches go fully opaque, non-matches dim to 0.2. The
    /// empty query matches everything. Search never changes attachment;
    /// opacity is last-writer-wins between search and filter.
    pub async fn search(&self, query: &str) {
        let mut state = self.state.write().await;
        let state = &mut *state;
        let query_lower = query.to_lowercase();

        for (cam, entry) in state.cameras.iter().zip(state.markers.iter_mut()) {
            let opacity = if cam.matches_query(&query_lower) {
                OPACITY_VISIBLE
            } else {
                OPACITY_DIMMED
            };
            entry.opacity = opacity;
            self.renderer.set_opacity(entry.handle, opacity);
        }

        state.query = query.to_string();
        tracing::debug!(query = %query, "Search applied");
    }

    /// Move the map viewport
    pub async fn fly_to(&self, view: &MapView) {
        self.renderer.set_view(view);
        tracing::debug!(lat = view.lat, lng = view.lng, zoom = view.zoom, "Viewport moved");
    }

    /// CSV report over the full camera list, visibility state ignored
    pub async fn export_report(&self) -> String {
        let state = self.state.read().await;
        crate::report::render_csv(&state.cameras)
    }

    /// Number of currently loaded cameras
    pub async fn camera_count(&self) -> usize {
        self.state.read().await.cameras.len()
    }

    /// Snapshot of the camera list
    pub async fn cameras(&self) -> Vec<CameraRecord> {
        self.state.read().await.cameras.clone()
    }

    /// Look up one camera by id
    pub async fn camera_by_id(&self, id: u64) -> Option<CameraRecord> {
        self.state
            .read()
            .await
            .cameras
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Marker visibility snapshot
    pub async fn marker_states(&self) -> Vec<MarkerState> {
        self.state
            .read()
            .await
            .markers
            .iter()
            .map(MarkerState::from)
            .collect()
    }

    /// Currently applied filter mode
    pub async fn current_filter(&self) -> FilterMode {
        self.state.read().await.filter
    }

    /// Currently applied search query
    pub async fn current_query(&self) -> String {
        self.state.read().await.query.clone()
    }
}
