//! End-to-end registry refresh against a fixture camera data source
//! served over real HTTP on an ephemeral port.

use axum::{routing::get, Json, Router};
use challan_map::camera_source::CameraSourceClient;
use challan_map::marker_registry::{FilterMode, MarkerRegistry};
use challan_map::realtime_hub::RealtimeHub;
use serde_json::{json, Value};
use std::sync::Arc;

/// Serve a JSON fixture at /api/cameras, returning the base URL
async fn serve_fixture(cameras: Value) -> String {
    let app = Router::new().route(
        "/api/cameras",
        get(move || {
            let cameras = cameras.clone();
            async move { Json(cameras) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn dashboard_registry() -> (Arc<MarkerRegistry>, Arc<RealtimeHub>) {
    let realtime = Arc::new(RealtimeHub::new());
    let registry = Arc::new(MarkerRegistry::new(realtime.clone(), realtime.clone()));
    (registry, realtime)
}

#[tokio::test]
async fn refresh_loads_cameras_and_notifies_dashboards() {
    let base_url = serve_fixture(json!([
        {
            "id": 1,
            "lat": 31.5,
            "lng": 74.3,
            "address": "Mall Road",
            "status": "active",
            "light_status": "green",
            "speed_limit": 60
        }
    ]))
    .await;

    let (registry, realtime) = dashboard_registry();
    let mut rx = realtime.subscribe();
    let client = CameraSourceClient::new(base_url);

    let total = registry.refresh(&client).await.unwrap();
    assert_eq!(total, 1);

    let markers = registry.marker_states().await;
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].camera_id, 1);
    assert!(markers[0].attached);

    // The rebuild ships the marker, then the summary count
    let added: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(added["type"], "marker_added");
    assert_eq!(added["data"]["marker"]["camera_id"], 1);
    assert_eq!(added["data"]["marker"]["icon"], "active");

    let count: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(count["type"], "camera_count");
    assert_eq!(count["data"]["total"], 1);
}

#[tokio::test]
async fn refresh_applies_payload_defaults() {
    let base_url = serve_fixture(json!([
        { "id": 5, "lat": 24.86, "lng": 67.0, "location": "Shahrah-e-Faisal", "status": "offline" }
    ]))
    .await;

    let (registry, _) = dashboard_registry();
    let client = CameraSourceClient::new(base_url);
    registry.refresh(&client).await.unwrap();

    let cam = registry.camera_by_id(5).await.unwrap();
    assert_eq!(cam.label(), "Shahrah-e-Faisal");
    assert_eq!(cam.speed_limit, 60);
    // Unknown status string falls back to the warning side
    assert_eq!(cam.status.to_string(), "inactive");
}

#[tokio::test]
async fn failed_refresh_leaves_registry_untouched() {
    let base_url = serve_fixture(json!([
        { "id": 1, "lat": 31.5, "lng": 74.3, "address": "Mall Road", "status": "active" },
        { "id": 2, "lat": 31.55, "lng": 74.35, "address": "Jail Road", "status": "inactive" }
    ]))
    .await;

    let (registry, _) = dashboard_registry();
    let client = CameraSourceClient::new(base_url);
    registry.refresh(&client).await.unwrap();
    let before = registry.cameras().await;

    // A listener that is bound and immediately dropped leaves a port
    // with nothing accepting on it
    let dead = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}", dead.local_addr().unwrap());
    drop(dead);

    let failing = CameraSourceClient::new(dead_url);
    assert!(registry.refresh(&failing).await.is_err());

    assert_eq!(registry.cameras().await, before);
    assert_eq!(registry.marker_states().await.len(), before.len());
}

#[tokio::test]
async fn malformed_body_is_rejected_without_partial_update() {
    let app = Router::new().route("/api/cameras", get(|| async { "not json" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let (registry, _) = dashboard_registry();
    let client = CameraSourceClient::new(format!("http://{}", addr));

    assert!(registry.refresh(&client).await.is_err());
    assert_eq!(registry.camera_count().await, 0);
}

#[tokio::test]
async fn filter_and_export_over_fetched_set() {
    let base_url = serve_fixture(json!([
        {
            "id": 1,
            "lat": 31.5204,
            "lng": 74.3587,
            "address": "Mall Road",
            "status": "active",
            "light_status": "green",
            "speed_limit": 60
        },
        {
            "id": 2,
            "lat": 31.5546,
            "lng": 74.3572,
            "address": "Jail Road",
            "status": "inactive",
            "light_status": "red",
            "speed_limit": 40
        }
    ]))
    .await;

    let (registry, _) = dashboard_registry();
    let client = CameraSourceClient::new(base_url);
    registry.refresh(&client).await.unwrap();

    registry.filter_by_status(FilterMode::Active).await;
    let markers = registry.marker_states().await;
    let attached: Vec<_> = markers.iter().filter(|m| m.attached).collect();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].camera_id, 1);
    assert_eq!(attached[0].opacity, 1.0);

    // Export ignores visibility: both cameras appear
    let csv = registry.export_report().await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("\"Mall Road\""));
    assert!(lines[2].contains("\"Jail Road\""));
}
