//! Geographic coordinates and distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Build a point from an optional pair. Both halves must be present.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => None,
        }
    }
}

/// Great-circle distance between two points using the haversine formula.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).is_none());
        assert!(GeoPoint::new(0.0, -180.5).is_none());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_none());
        assert!(GeoPoint::new(-90.0, 180.0).is_some());
    }

    #[test]
    fn test_from_parts_requires_both() {
        assert!(GeoPoint::from_parts(Some(10.0), None).is_none());
        assert!(GeoPoint::from_parts(None, Some(10.0)).is_none());
        assert!(GeoPoint::from_parts(Some(10.0), Some(20.0)).is_some());
    }

    #[test]
    fn test_zero_distance() {
        let p = GeoPoint::new(37.77, -122.42).unwrap();
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance_paris_london() {
        let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
        let london = GeoPoint::new(51.5074, -0.1278).unwrap();
        let d = haversine_km(paris, london);
        assert!((d - 343.5).abs() < 2.0, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(-33.87, 151.21).unwrap();
        let b = GeoPoint::new(35.68, 139.69).unwrap();
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }
}
