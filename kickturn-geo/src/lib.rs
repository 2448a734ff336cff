//! kickturn-geo - Geodesy Primitives
//!
//! Pure, stateless functions over WGS84 points: haversine great-circle
//! distance, radius membership, and fixed-width grid binning for density
//! aggregation. No IO, no shared state; identical inputs always produce
//! identical outputs.

use kickturn_core::GeoPoint;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Reference grid cell width in decimal degrees (roughly 28 km of latitude).
pub const DEFAULT_BIN_SIZE_DEGREES: f64 = 0.25;

/// Great-circle distance between two points in kilometers.
///
/// Haversine with the atan2 form, which stays numerically stable for both
/// near-zero and antipodal separations. Callers are expected to pass
/// in-domain WGS84 points; filter and config validation guard the entry
/// points.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// True when `point` lies within `radius_km` of `origin`, boundary included.
pub fn within_radius(origin: GeoPoint, point: GeoPoint, radius_km: f64) -> bool {
    distance_km(origin, point) <= radius_km
}

/// Grid cell index at a fixed bin width.
///
/// Indices are floor divisions of the coordinates, so ordering is
/// south-to-north and west-to-east and negative coordinates bin correctly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GeoBinKey {
    pub lat_bin: i32,
    pub lon_bin: i32,
}

impl GeoBinKey {
    /// South-west corner of the cell as `(lat, lon)` degrees.
    pub fn origin_degrees(&self, bin_size_degrees: f64) -> (f64, f64) {
        (
            self.lat_bin as f64 * bin_size_degrees,
            self.lon_bin as f64 * bin_size_degrees,
        )
    }
}

/// Map a point to its grid cell at the given bin width.
///
/// Deterministic: the same point always lands in the same cell, and two
/// points land in the same cell iff both floor divisions agree.
pub fn bin(point: GeoPoint, bin_size_degrees: f64) -> GeoBinKey {
    GeoBinKey {
        lat_bin: (point.lat / bin_size_degrees).floor() as i32,
        lon_bin: (point.lon / bin_size_degrees).floor() as i32,
    }
}

// =============================================================================
// TESTS
// =============================================================================
