//! Query point to WMS bounding box resolution.

use aquifer_common::{AxisOrder, BBoxParams, CrsCode, GeoPoint, QueryWindow};
use tracing::debug;

use crate::mercator;
use crate::transverse_mercator::MgaZone;
use crate::ProjectionError;

/// Transform a caller point into Web Mercator (EPSG:3857) meters.
///
/// GDA94 and GDA2020 geographic coordinates are taken as equal to WGS84;
/// the datum offset (under 2 m) is far below any useful query resolution.
pub fn to_web_mercator(point: &GeoPoint) -> Result<(f64, f64), ProjectionError> {
    let crs = CrsCode::from_wms_string(point.crs())
        .map_err(|_| ProjectionError::UnsupportedCrs(point.crs().to_string()))?;

    let (a, b) = point.coordinates();

    if crs == CrsCode::Epsg3857 {
        if !a.is_finite() || !b.is_finite() {
            return Err(ProjectionError::NonFinite);
        }
        return Ok((a, b));
    }

    if let Some(zone) = crs.mga_zone() {
        let (lon, lat) = MgaZone::new(zone)?.inverse(a, b)?;
        return mercator::forward(lon, lat);
    }

    if !crs.is_geographic() {
        return Err(ProjectionError::UnsupportedCrs(crs.to_string()));
    }

    let (lon, lat) = match crs.axis_order() {
        AxisOrder::LatLon => (b, a),
        AxisOrder::XY => (a, b),
    };
    mercator::forward(lon, lat)
}

/// Resolve a point and window into the bbox/pixel parameters of a query.
///
/// The box is centered on the projected point with a half extent of
/// `pixels * resolution / 2` on each axis; the sample pixel is the
/// integer center of the window.
pub fn resolve(point: &GeoPoint, window: &QueryWindow) -> Result<BBoxParams, ProjectionError> {
    let (x, y) = to_web_mercator(point)?;
    let params = BBoxParams::centered_on(x, y, window);

    debug!(
        crs = point.crs(),
        x = x,
        y = y,
        bbox = %params.bbox.to_wms_string(),
        "Resolved query bbox"
    );

    Ok(params)
}
