//! Map-space geometry primitives.
//!
//! The raster overlay is georeferenced in a flat coordinate system where
//! `lat` runs along the image height and `lng` along the width, matching
//! the `[[lat, lng], ...]` pairs the backend stores. All distances are
//! plain Euclidean; no geodesic correction applies.

use serde::{Deserialize, Serialize};

/// A coordinate in map space.
///
/// Serializes to and from a two-element `[lat, lng]` array, the wire format
/// used by the layer snapshot and save calls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Euclidean distance to another coordinate, in map units.
    pub fn distance_to(&self, other: LatLng) -> f64 {
        let dlat = self.lat - other.lat;
        let dlng = self.lng - other.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for (f64, f64) {
    fn from(p: LatLng) -> Self {
        (p.lat, p.lng)
    }
}

/// Axis-aligned bounds in map space.
///
/// Invariant: `south <= north` and `west <= east`; the constructors
/// normalize corner order so callers can pass corners as dragged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Bounds spanning two corners given in any order.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south: a.lat.min(b.lat),
            west: a.lng.min(b.lng),
            north: a.lat.max(b.lat),
            east: a.lng.max(b.lng),
        }
    }

    /// Smallest bounds covering all points, or `None` for an empty slice.
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::from_corners(*first, *first);
        for p in rest {
            bounds.south = bounds.south.min(p.lat);
            bounds.west = bounds.west.min(p.lng);
            bounds.north = bounds.north.max(p.lat);
            bounds.east = bounds.east.max(p.lng);
        }
        Some(bounds)
    }

    /// Whether `p` lies inside the bounds (edges inclusive).
    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latlng_serializes_as_pair() {
        let p = LatLng::new(10.0, 20.0);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[10.0,20.0]");

        let back: LatLng = serde_json::from_str("[10.0,20.0]").unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn corners_normalize_in_any_order() {
        let bounds = GeoBounds::from_corners(LatLng::new(10.0, 30.0), LatLng::new(5.0, 20.0));
        assert_eq!(bounds.south, 5.0);
        assert_eq!(bounds.west, 20.0);
        assert_eq!(bounds.north, 10.0);
        assert_eq!(bounds.east, 30.0);
    }

    #[test]
    fn contains_includes_edges() {
        let bounds = GeoBounds::from_corners(LatLng::new(0.0, 0.0), LatLng::new(10.0, 10.0));
        assert!(bounds.contains(LatLng::new(0.0, 0.0)));
        assert!(bounds.contains(LatLng::new(10.0, 10.0)));
        assert!(bounds.contains(LatLng::new(5.0, 5.0)));
        assert!(!bounds.contains(LatLng::new(10.1, 5.0)));
    }

    #[test]
    fn bounds_from_points_covers_all() {
        let points = [
            LatLng::new(1.0, 9.0),
            LatLng::new(4.0, 2.0),
            LatLng::new(-3.0, 5.0),
        ];
        let bounds = GeoBounds::from_points(&points).unwrap();
        assert_eq!(bounds.south, -3.0);
        assert_eq!(bounds.west, 2.0);
        assert_eq!(bounds.north, 4.0);
        assert_eq!(bounds.east, 9.0);

        assert!(GeoBounds::from_points(&[]).is_none());
    }
}
