//! City fly-to presets for the dashboard's quick-jump control

use crate::map_renderer::MapView;

/// Look up a preset viewport by city name, case-insensitively
pub fn lookup(city: &str) -> Option<MapView> {
    let view = match city.to_lowercase().as_str() {
        "pakistan" => MapView {
            lat: 30.3753,
            lng: 69.3451,
            zoom: 6,
        },
        "karachi" => MapView {
            lat: 24.8607,
            lng: 67.0011,
            zoom: 12,
        },
        "lahore" => MapView {
            lat: 31.5204,
            lng: 74.3587,
            zoom: 12,
        },
        "islamabad" => MapView {
            lat: 33.6844,
            lng: 73.0479,
            zoom: 12,
        },
        "peshawar" => MapView {
            lat: 34.0151,
            lng: 71.5249,
            zoom: 12,
        },
        "quetta" => MapView {
            lat: 30.1798,
            lng: 66.9750,
            zoom: 12,
        },
        _ => return None,
    };
    Some(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_cities() {
        for city in ["pakistan", "karachi", "lahore", "islamabad", "peshawar", "quetta"] {
            assert!(lookup(city).is_some(), "missing preset for {}", city);
        }
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup("Lahore"), lookup("lahore"));
        assert_eq!(lookup("KARACHI").unwrap().zoom, 12);
    }

    #[test]
    fn test_lookup_unknown_city() {
        assert!(lookup("atlantis").is_none());
    }

    #[test]
    fn test_country_view_zooms_out() {
        assert_eq!(lookup("pakistan").unwrap().zoom, 6);
    }
}
