//! Coordinate Reference System identifiers accepted from callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CRS codes the resolver knows how to bring into Web Mercator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic, authority axis order (lat, lon)
    Epsg4326,
    /// OGC CRS:84, WGS84 with (lon, lat) axis order
    Crs84,
    /// GDA94 Geographic (lat, lon)
    Epsg4283,
    /// GDA2020 Geographic (lat, lon)
    Epsg7844,
    /// Web Mercator (meters), the working projection of the WMS service
    Epsg3857,
    /// GDA94 / MGA zone 54
    Epsg28354,
    /// GDA94 / MGA zone 55
    Epsg28355,
    /// GDA2020 / MGA zone 54
    Epsg7854,
    /// GDA2020 / MGA zone 55
    Epsg7855,
}

impl CrsCode {
    /// Parse a caller-supplied CRS identifier.
    ///
    /// Accepts formats like:
    /// - "wgs84" (the default used by the web frontend)
    /// - "EPSG:4326" / "epsg:4326"
    /// - "CRS:84"
    /// - "EPSG:28355"
    pub fn from_wms_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "WGS84" | "WGS 84" | "EPSG:4326" => Ok(CrsCode::Epsg4326),
            "CRS:84" | "OGC:CRS84" => Ok(CrsCode::Crs84),
            "GDA94" | "EPSG:4283" => Ok(CrsCode::Epsg4283),
            "GDA2020" | "EPSG:7844" => Ok(CrsCode::Epsg7844),
            "EPSG:3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            "EPSG:28354" => Ok(CrsCode::Epsg28354),
            "EPSG:28355" => Ok(CrsCode::Epsg28355),
            "EPSG:7854" => Ok(CrsCode::Epsg7854),
            "EPSG:7855" => Ok(CrsCode::Epsg7855),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Axis order in which callers supply coordinates for this CRS.
    ///
    /// Geographic EPSG codes use their authority order (lat, lon);
    /// CRS:84 and projected systems use (x, y).
    pub fn axis_order(&self) -> AxisOrder {
        match self {
            CrsCode::Epsg4326 | CrsCode::Epsg4283 | CrsCode::Epsg7844 => AxisOrder::LatLon,
            _ => AxisOrder::XY,
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(
            self,
            CrsCode::Epsg4326 | CrsCode::Crs84 | CrsCode::Epsg4283 | CrsCode::Epsg7844
        )
    }

    /// MGA zone number for the grid systems, `None` otherwise.
    pub fn mga_zone(&self) -> Option<u8> {
        match self {
            CrsCode::Epsg28354 | CrsCode::Epsg7854 => Some(54),
            CrsCode::Epsg28355 | CrsCode::Epsg7855 => Some(55),
            _ => None,
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Crs84 => "CRS:84",
            CrsCode::Epsg4283 => "EPSG:4283",
            CrsCode::Epsg7844 => "EPSG:7844",
            CrsCode::Epsg3857 => "EPSG:3857",
            CrsCode::Epsg28354 => "EPSG:28354",
            CrsCode::Epsg28355 => "EPSG:28355",
            CrsCode::Epsg7854 => "EPSG:7854",
            CrsCode::Epsg7855 => "EPSG:7855",
        };
        write!(f, "{}", code)
    }
}

/// Axis order for coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// X (longitude/easting), Y (latitude/northing)
    XY,
    /// Y (latitude/northing), X (longitude/easting)
    LatLon,
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
