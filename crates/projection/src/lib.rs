//! Coordinate reference system transformations.
//!
//! Implements the projections needed to place a query point in the WMS
//! working projection (EPSG:3857) from scratch without external dependencies.

pub mod mercator;
pub mod resolver;
pub mod transverse_mercator;

pub use resolver::{resolve, to_web_mercator};
pub use transverse_mercator::MgaZone;

use aquifer_common::AquiferError;

/// Errors raised while transforming coordinates.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Transform undefined: {0}")]
    Undefined(String),

    #[error("Coordinate out of range: {0}")]
    OutOfRange(String),

    #[error("Coordinates must be finite numbers")]
    NonFinite,
}

impl From<ProjectionError> for AquiferError {
    fn from(err: ProjectionError) -> Self {
        AquiferError::CoordinateTransform(err.to_string())
    }
}
