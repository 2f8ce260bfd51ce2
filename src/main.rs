//! challan-map - Traffic Camera Map Dashboard Engine
//!
//! Main entry point for the dashboard service.

use challan_map::{
    activity_feed::ActivityFeed,
    camera_source::CameraSourceClient,
    marker_registry::MarkerRegistry,
    realtime_hub::RealtimeHub,
    state::{AppConfig, AppState},
    violation_monitor::ViolationMonitor,
    web_api,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "challan_map=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting challan-map v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::default();
    tracing::info!(
        camera_api_url = %config.camera_api_url,
        host = %config.host,
        port = config.port,
        static_dir = %config.static_dir,
        fetch_timeout_sec = config.fetch_timeout_sec,
        "Configuration loaded"
    );

    // Initialize components
    let camera_source = Arc::new(CameraSourceClient::with_timeout(
        config.camera_api_url.clone(),
        Duration::from_secs(config.fetch_timeout_sec),
    ));

    let realtime = Arc::new(RealtimeHub::new());
    let registry = Arc::new(MarkerRegistry::new(realtime.clone(), realtime.clone()));
    tracing::info!("MarkerRegistry initialized (dashboards render by broadcast)");

    let activity = Arc::new(ActivityFeed::default());
    let violations = Arc::new(ViolationMonitor::new(activity.clone(), realtime.clone()));

    // Create application state
    let state = AppState {
        config,
        camera_source,
        registry,
        realtime,
        activity,
        violations,
    };

    // Initial camera load; a failure is tolerated and the service starts
    // with an empty registry until the next refresh succeeds
    match state.registry.refresh(state.camera_source.as_ref()).await {
        Ok(total) => tracing::info!(total, "Initial camera load complete"),
        Err(e) => tracing::warn!(error = %e, "Initial camera load failed, starting empty"),
    }

    // Create router with static dashboard serving
    let serve_dir = ServeDir::new(&state.config.static_dir).not_found_service(ServeFile::new(
        format!("{}/index.html", state.config.static_dir),
    ));

    let app = web_api::create_router(state.clone())
        .fallback_service(serve_dir)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    tracing::info!(static_dir = %state.config.static_dir, "Static dashboard serving enabled");

    // Start server
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
