//! CSV report rendering
//!
//! The export covers the full camera list regardless of filter/search
//! visibility; only the address field is quoted.

use crate::marker_registry::CameraRecord;
use chrono::NaiveDate;
use std::fmt::Write;

/// Fixed header row
pub const CSV_HEADER: &str =
    "Camera ID,Address,Status,Traffic Light,Speed Limit,Latitude,Longitude";

/// Render the camera list as CSV, one newline-terminated row per camera
pub fn render_csv(cameras: &[CameraRecord]) -> String {
    let mut csv = String::with_capacity(64 * (cameras.len() + 1));
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for cam in cameras {
        // writeln! to a String cannot fail
        let _ = writeln!(
            csv,
            "{},\"{}\",{},{},{},{},{}",
            cam.id,
            cam.label(),
            cam.status,
            cam.light_status_display(),
            cam.speed_limit,
            cam.lat,
            cam.lng
        );
    }

    csv
}

/// Download filename for the given report date
pub fn report_filename(date: NaiveDate) -> String {
    format!("e-challan-report-{}.csv", date.format("%Y-%m-%d"))
}
