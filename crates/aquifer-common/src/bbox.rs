//! Query geometry: input point, pixel window and the derived bounding box.

use serde::{Deserialize, Serialize};

use crate::{AquiferError, AquiferResult};

/// A projected bounding box.
///
/// Coordinates are in the units of the CRS the box was built in; for the
/// WMS working projection (EPSG:3857) that is meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Format as a WMS BBOX parameter: "minx,miny,maxx,maxy".
    ///
    /// Uses the shortest round-trip float representation so the same box
    /// always produces the same string.
    pub fn to_wms_string(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// An input coordinate pair tagged with the CRS it is expressed in.
///
/// The coordinate order follows the CRS axis order (for "wgs84" that is
/// latitude first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    coordinates: (f64, f64),
    crs: String,
}

impl GeoPoint {
    pub fn new(coordinates: (f64, f64), crs: impl Into<String>) -> Self {
        Self {
            coordinates,
            crs: crs.into(),
        }
    }

    /// Coordinates in the order they were supplied.
    pub fn coordinates(&self) -> (f64, f64) {
        self.coordinates
    }

    /// The CRS identifier as supplied by the caller.
    pub fn crs(&self) -> &str {
        &self.crs
    }
}

/// Resolution and pixel dimensions of the sampled map window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryWindow {
    /// Ground size of one pixel in meters
    resolution: f64,
    width: u32,
    height: u32,
}

impl QueryWindow {
    /// Create a window, rejecting non-positive resolutions and empty pixel grids.
    pub fn new(resolution: f64, width: u32, height: u32) -> AquiferResult<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(AquiferError::InvalidQuery(format!(
                "resolution must be a positive number of meters, got {}",
                resolution
            )));
        }
        if width == 0 || height == 0 {
            return Err(AquiferError::InvalidQuery(format!(
                "pixel window must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            resolution,
            width,
            height,
        })
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for QueryWindow {
    /// 100 m resolution over a 100x100 pixel window.
    fn default() -> Self {
        Self {
            resolution: 100.0,
            width: 100,
            height: 100,
        }
    }
}

/// Bounding box plus pixel geometry sent with every GetFeatureInfo request.
///
/// Always derived from a [`QueryWindow`]; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBoxParams {
    pub bbox: BoundingBox,
    pub width: u32,
    pub height: u32,
    /// Sample pixel column
    pub x: u32,
    /// Sample pixel row
    pub y: u32,
}

impl BBoxParams {
    /// Center a window on a point already in the working projection.
    pub fn centered_on(x: f64, y: f64, window: &QueryWindow) -> Self {
        let half_w = f64::from(window.width) * window.resolution / 2.0;
        let half_h = f64::from(window.height) * window.resolution / 2.0;

        Self {
            bbox: BoundingBox::new(x - half_w, y - half_h, x + half_w, y + half_h),
            width: window.width,
            height: window.height,
            x: window.width / 2,
            y: window.height / 2,
        }
    }
}
