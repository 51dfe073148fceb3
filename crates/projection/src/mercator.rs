//! Spherical Web Mercator (EPSG:3857).
//!
//! The projection used by web map services: WGS84 geographic coordinates
//! are projected onto a sphere with the WGS84 semi-major axis as radius.

use std::f64::consts::PI;

use crate::ProjectionError;

/// Sphere radius used by EPSG:3857 (meters).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the projected world width (meters).
pub const MAX_EXTENT: f64 = PI * EARTH_RADIUS;

/// Project geographic degrees to Web Mercator meters.
///
/// Latitudes of ±90° map to infinity and are rejected, as are values
/// outside the valid geographic range.
pub fn forward(lon_deg: f64, lat_deg: f64) -> Result<(f64, f64), ProjectionError> {
    if !lon_deg.is_finite() || !lat_deg.is_finite() {
        return Err(ProjectionError::NonFinite);
    }
    if lat_deg.abs() >= 90.0 {
        return Err(ProjectionError::Undefined(format!(
            "latitude {} has no Web Mercator image",
            lat_deg
        )));
    }
    if lon_deg.abs() > 180.0 {
        return Err(ProjectionError::OutOfRange(format!(
            "longitude {} outside [-180, 180]",
            lon_deg
        )));
    }

    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();

    let x = EARTH_RADIUS * lon;
    let y = EARTH_RADIUS * (PI / 4.0 + lat / 2.0).tan().ln();

    if !y.is_finite() {
        return Err(ProjectionError::Undefined(format!(
            "latitude {} projects to a non-finite northing",
            lat_deg
        )));
    }

    Ok((x, y))
}
