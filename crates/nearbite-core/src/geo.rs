//! Distance and rounding primitives shared by caching and deduplication.
//!
//! Distances use the haversine formula on a spherical Earth. At restaurant
//! search scales (< 50 km) the error against an ellipsoid is well under 0.5%.

use crate::candidate::Coordinate;

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Decimal places used for dedup keys. 3 places is a ~111 m grid.
pub const DEDUP_KEY_PRECISION: usize = 3;

/// Great-circle distance between two coordinates in meters.
#[must_use]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    // Clamp guards `asin` against h drifting a hair above 1.0 for antipodes.
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Round both components to `precision` decimal places and format them as
/// `"lat,lng"`.
///
/// `-0.000` is normalised to `0.000` so points either side of the equator or
/// prime meridian in the same cell produce the same key.
#[must_use]
pub fn rounded_key(c: Coordinate, precision: usize) -> String {
    let lat = round_to(c.latitude, precision);
    let lng = round_to(c.longitude, precision);
    format!("{lat:.precision$},{lng:.precision$}")
}

fn round_to(value: f64, precision: usize) -> f64 {
    let exponent = i32::try_from(precision).unwrap_or(i32::MAX);
    let factor = 10f64.powi(exponent);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Axis-aligned lat/lng box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

impl Region {
    /// `true` if `c` falls inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, c: Coordinate) -> bool {
        (self.south..=self.north).contains(&c.latitude)
            && (self.west..=self.east).contains(&c.longitude)
    }
}

/// Box enclosing the circle of `radius_m` around `center`.
///
/// The longitude span widens with latitude so the box keeps covering the same
/// physical distance; it is clamped to valid lat/lng ranges near the poles and
/// the antimeridian.
#[must_use]
pub fn bounding_region(center: Coordinate, radius_m: f64) -> Region {
    let d_lat = (radius_m / EARTH_RADIUS_M).to_degrees();
    let cos_lat = center.latitude.to_radians().cos().abs().max(1e-6);
    let d_lng = (d_lat / cos_lat).min(180.0);

    Region {
        north: (center.latitude + d_lat).min(90.0),
        south: (center.latitude - d_lat).max(-90.0),
        east: (center.longitude + d_lng).min(180.0),
        west: (center.longitude - d_lng).max(-180.0),
    }
}
