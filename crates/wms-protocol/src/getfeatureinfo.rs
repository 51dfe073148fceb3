//! WMS GetFeatureInfo request construction.
//!
//! Every query against the aquifer framework service is a GetFeatureInfo
//! request sharing one parameter template; the variants differ only in
//! protocol version and layer identifiers.

use std::collections::BTreeMap;

use aquifer_common::{AquiferError, AquiferLayerCode, AquiferResult, BBoxParams};

/// GeoServer endpoint of the Victorian Aquifer Framework.
pub const DEFAULT_BASE_URL: &str = "https://geo.cerdi.edu.au/geoserver/vvg/wms";

/// Maximum number of features returned per query.
pub const FEATURE_COUNT: u32 = 50;

/// Spatial reference of every bbox we send.
pub const WORKING_SRS: &str = "EPSG:3857";

/// Scheme-only base the canonical form is encoded against.
const CANONICAL_BASE: &str = "aquifer:gfi";

/// WMS protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmsVersion {
    V111,
    V130,
}

impl WmsVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            WmsVersion::V111 => "1.1.1",
            WmsVersion::V130 => "1.3.0",
        }
    }
}

/// The three queries issued by the depth-profile pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WmsRequestVariant {
    /// Discover which aquifer layers exist under the point.
    Layers,
    /// Per-layer depth/thickness attributes for a discovered layer list.
    AquiferInfo { layers: String },
    /// Depth to the water table.
    WatertableDepth,
}

impl WmsRequestVariant {
    /// Build the aquifer-info variant from discovered layer codes.
    pub fn aquifer_info(codes: &[AquiferLayerCode]) -> Self {
        WmsRequestVariant::AquiferInfo {
            layers: layer_list_string(codes),
        }
    }

    /// Short name used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            WmsRequestVariant::Layers => "layers",
            WmsRequestVariant::AquiferInfo { .. } => "aquifer_info",
            WmsRequestVariant::WatertableDepth => "watertable_depth",
        }
    }

    pub fn version(&self) -> WmsVersion {
        match self {
            WmsRequestVariant::Layers | WmsRequestVariant::AquiferInfo { .. } => WmsVersion::V111,
            WmsRequestVariant::WatertableDepth => WmsVersion::V130,
        }
    }

    /// (layers, query_layers) for this variant.
    fn layer_ids(&self) -> (&str, &str) {
        match self {
            WmsRequestVariant::Layers => ("vvg:vaf_primary_group", "vvg:vaf_outlines_3857"),
            WmsRequestVariant::AquiferInfo { layers } => (layers.as_str(), layers.as_str()),
            WmsRequestVariant::WatertableDepth => (
                "vvg:vaf_depth_watertable_swl100_raw_3857",
                "vvg:vaf_depth_watertable_swl100_raw_3857",
            ),
        }
    }
}

/// Comma-separated group layer names, e.g. "vaf_100qa_group,vaf_114bse_group".
pub fn layer_list_string(codes: &[AquiferLayerCode]) -> String {
    codes
        .iter()
        .map(|code| code.group_layer_name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Fully expanded GetFeatureInfo parameters in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    params: Vec<(String, String)>,
}

impl RequestParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Key-sorted, form-urlencoded `key=value` pairs joined by `&`.
    ///
    /// Independent of insertion order. Keys and values are escaped the same
    /// way as in [`to_url`](Self::to_url), so distinct parameter sets never
    /// share a canonical form.
    pub fn canonical_string(&self) -> AquiferResult<String> {
        let sorted: BTreeMap<&str, &str> = self.iter().collect();
        let url = reqwest::Url::parse_with_params(CANONICAL_BASE, sorted).map_err(|e| {
            AquiferError::InvalidQuery(format!("cannot encode request parameters: {}", e))
        })?;
        Ok(url.query().unwrap_or_default().to_string())
    }

    /// Encode as a URL against `base_url` (application/x-www-form-urlencoded query).
    pub fn to_url(&self, base_url: &str) -> AquiferResult<String> {
        let url = reqwest::Url::parse_with_params(base_url, self.iter()).map_err(|e| {
            AquiferError::InvalidQuery(format!("invalid WMS base URL '{}': {}", base_url, e))
        })?;
        Ok(url.into())
    }

    fn set(&mut self, key: String, value: String) {
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
    }
}

impl FromIterator<(String, String)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut params = RequestParams { params: Vec::new() };
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

/// Builder merging the shared template, bbox fields and overrides.
#[derive(Debug, Clone)]
pub struct GetFeatureInfoBuilder<'a> {
    variant: &'a WmsRequestVariant,
    bbox: &'a BBoxParams,
    overrides: BTreeMap<String, String>,
}

impl<'a> GetFeatureInfoBuilder<'a> {
    pub fn new(variant: &'a WmsRequestVariant, bbox: &'a BBoxParams) -> Self {
        Self {
            variant,
            bbox,
            overrides: BTreeMap::new(),
        }
    }

    /// Override or add a parameter; overrides are applied in key order.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> RequestParams {
        let (layers, query_layers) = self.variant.layer_ids();

        let mut params: RequestParams = [
            ("service", "WMS".to_string()),
            ("version", self.variant.version().as_str().to_string()),
            ("request", "GetFeatureInfo".to_string()),
            ("layers", layers.to_string()),
            ("query_layers", query_layers.to_string()),
            ("styles", String::new()),
            ("bbox", self.bbox.bbox.to_wms_string()),
            ("width", self.bbox.width.to_string()),
            ("height", self.bbox.height.to_string()),
            ("srs", WORKING_SRS.to_string()),
            ("format", "image/png".to_string()),
            ("info_format", "text/html".to_string()),
            ("x", self.bbox.x.to_string()),
            ("y", self.bbox.y.to_string()),
            ("FEATURE_COUNT", FEATURE_COUNT.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        for (k, v) in self.overrides {
            params.set(k, v);
        }

        params
    }
}

/// Build the parameters of `variant` for `bbox` with caller overrides.
pub fn build(
    variant: &WmsRequestVariant,
    bbox: &BBoxParams,
    extra: &BTreeMap<String, String>,
) -> RequestParams {
    extra
        .iter()
        .fold(GetFeatureInfoBuilder::new(variant, bbox), |b, (k, v)| {
            b.param(k.clone(), v.clone())
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquifer_common::QueryWindow;

    fn bbox() -> BBoxParams {
        BBoxParams::centered_on(16_000_000.0, -4_500_000.0, &QueryWindow::default())
    }

    #[test]
    fn test_layers_variant_template() {
        let bbox = bbox();
        let params = GetFeatureInfoBuilder::new(&WmsRequestVariant::Layers, &bbox).build();

        assert_eq!(params.get("service"), Some("WMS"));
        assert_eq!(params.get("version"), Some("1.1.1"));
        assert_eq!(params.get("request"), Some("GetFeatureInfo"));
        assert_eq!(params.get("layers"), Some("vvg:vaf_primary_group"));
        assert_eq!(params.get("query_layers"), Some("vvg:vaf_outlines_3857"));
        assert_eq!(params.get("styles"), Some(""));
        assert_eq!(params.get("bbox"), Some("15995000,-4505000,16005000,-4495000"));
        assert_eq!(params.get("srs"), Some("EPSG:3857"));
        assert_eq!(params.get("info_format"), Some("text/html"));
        assert_eq!(params.get("x"), Some("50"));
        assert_eq!(params.get("FEATURE_COUNT"), Some("50"));
        assert_eq!(params.len(), 15);
    }

    #[test]
    fn test_watertable_variant_uses_130() {
        let bbox = bbox();
        let params = GetFeatureInfoBuilder::new(&WmsRequestVariant::WatertableDepth, &bbox).build();
        assert_eq!(params.get("version"), Some("1.3.0"));
        assert_eq!(
            params.get("query_layers"),
            Some("vvg:vaf_depth_watertable_swl100_raw_3857")
        );
    }

    #[test]
    fn test_aquifer_info_layers() {
        let variant = WmsRequestVariant::aquifer_info(&[
            AquiferLayerCode::Qa100,
            AquiferLayerCode::Lta111,
            AquiferLayerCode::Bse114,
        ]);
        let bbox = bbox();
        let params = GetFeatureInfoBuilder::new(&variant, &bbox).build();

        let expected = "vaf_100qa_group,vaf_111lta_group,vaf_114bse_group";
        assert_eq!(params.get("layers"), Some(expected));
        assert_eq!(params.get("query_layers"), Some(expected));
        assert_eq!(variant.name(), "aquifer_info");
    }

    #[test]
    fn test_overrides_replace_in_place() {
        let bbox = bbox();
        let mut extra = BTreeMap::new();
        extra.insert("FEATURE_COUNT".to_string(), "10".to_string());
        extra.insert("buffer".to_string(), "5".to_string());

        let params = build(&WmsRequestVariant::Layers, &bbox, &extra);
        assert_eq!(params.get("FEATURE_COUNT"), Some("10"));
        assert_eq!(params.get("buffer"), Some("5"));
        assert_eq!(params.len(), 16);
    }

    #[test]
    fn test_url_is_deterministic() {
        let bbox = bbox();
        let a = GetFeatureInfoBuilder::new(&WmsRequestVariant::Layers, &bbox).build();
        let b = GetFeatureInfoBuilder::new(&WmsRequestVariant::Layers, &bbox).build();

        let url_a = a.to_url(DEFAULT_BASE_URL).unwrap();
        assert_eq!(url_a, b.to_url(DEFAULT_BASE_URL).unwrap());
        assert!(url_a.starts_with("https://geo.cerdi.edu.au/geoserver/vvg/wms?service=WMS&version=1.1.1"));
        assert!(url_a.contains("layers=vvg%3Avaf_primary_group"));
        assert!(url_a.contains("bbox=15995000%2C-4505000%2C16005000%2C-4495000"));
    }

    #[test]
    fn test_canonical_string_ignores_order() {
        let a: RequestParams = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]
        .into_iter()
        .collect();
        let b: RequestParams = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]
        .into_iter()
        .collect();

        assert_ne!(a, b);
        assert_eq!(a.canonical_string().unwrap(), "a=1&b=2");
        assert_eq!(a.canonical_string().unwrap(), b.canonical_string().unwrap());
    }

    #[test]
    fn test_canonical_string_escapes_separators() {
        let bbox = bbox();
        let smuggled = build(
            &WmsRequestVariant::Layers,
            &bbox,
            &BTreeMap::from([("y".to_string(), "50&z=1".to_string())]),
        );
        let plain = build(
            &WmsRequestVariant::Layers,
            &bbox,
            &BTreeMap::from([("z".to_string(), "1".to_string())]),
        );

        let canonical = smuggled.canonical_string().unwrap();
        assert!(canonical.contains("y=50%26z%3D1"));
        assert_ne!(canonical, plain.canonical_string().unwrap());

        let layers = plain.canonical_string().unwrap();
        assert!(layers.contains("layers=vvg%3Avaf_primary_group"));
        assert!(layers.contains("styles=&"));
    }

    #[test]
    fn test_bad_base_url() {
        let bbox = bbox();
        let params = GetFeatureInfoBuilder::new(&WmsRequestVariant::Layers, &bbox).build();
        assert!(params.to_url("not a url").is_err());
    }
}
