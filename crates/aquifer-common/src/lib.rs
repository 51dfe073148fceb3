//! Common types shared across the aquifer depth-profile crates.

pub mod bbox;
pub mod crs;
pub mod depth_table;
pub mod error;
pub mod feasibility;
pub mod layer;
pub mod response;

pub use bbox::{BBoxParams, BoundingBox, GeoPoint, QueryWindow};
pub use crs::{AxisOrder, CrsCode};
pub use depth_table::{normalize, DepthTable, DepthTableColumns, DepthTableRow, RawLayerAttributes};
pub use error::{AquiferError, AquiferResult};
pub use feasibility::{assess, FeasibilityResult};
pub use layer::{AquiferLayerCode, LayerInfo, LAYER_TABLE};
pub use response::RawResponse;
