//! OGC WMS GetFeatureInfo support for the aquifer framework service.
//!
//! - Request construction for the three query variants (WMS 1.1.1 and 1.3.0)
//! - Lenient HTML parsing of the returned feature templates

pub mod feature_info;
pub mod getfeatureinfo;
pub mod html;

pub use feature_info::{parse_attribute_rows, parse_layer_list, parse_scalar_depth};
pub use getfeatureinfo::{
    build, layer_list_string, GetFeatureInfoBuilder, RequestParams,
    WmsRequestVariant, WmsVersion, DEFAULT_BASE_URL, FEATURE_COUNT,
};
