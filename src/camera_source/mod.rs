//! CameraSource - Camera Data Source Adapter
//!
//! ## Responsibilities
//!
//! - Fetch the camera list from the configured endpoint
//! - Handle response parsing
//! - Connectivity probe for the health surface

use crate::error::{Error, Result};
use crate::marker_registry::CameraRecord;
use std::future::Future;
use std::time::Duration;

/// Camera list provider seam
///
/// The registry refreshes through this; [`CameraSourceClient`] is the
/// canonical implementation, tests substitute fixtures.
pub trait CameraFetch {
    fn fetch_cameras(&self) -> impl Future<Output = Result<Vec<CameraRecord>>> + Send;
}

/// HTTP client for the camera data source
///
/// `GET <base>/api/cameras` returns a JSON array of camera objects; no
/// auth, no pagination, no query parameters.
pub struct CameraSourceClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CameraSourceClient {
    /// Create a new client with the default 10 second timeout
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// Create a new client with a custom fetch timeout
    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            timeout,
        }
    }

    /// Probe the camera endpoint
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/cameras", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CameraFetch for CameraSourceClient {
    async fn fetch_cameras(&self) -> Result<Vec<CameraRecord>> {
        let url = format!("{}/api/cameras", self.base_url);
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(Error::DataSource(format!(
                "camera list fetch failed: {}",
                resp.status()
            )));
        }

        let cameras: Vec<CameraRecord> = resp.json().await?;
        Ok(cameras)
    }
}
