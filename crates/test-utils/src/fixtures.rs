//! Common test fixtures for aquifer profile tests.
//!
//! Response bodies mirror the markup produced by the GeoServer feature
//! templates of the Victorian Aquifer Framework.

/// Query points used across the workspace tests.
pub mod points {
    /// A site near Ballarat, Victoria, as (lat, lon) in WGS84 axis order.
    pub const BALLARAT_WGS84: (f64, f64) = (-37.5622, 143.8503);

    /// The same site as (lon, lat).
    pub const BALLARAT_CRS84: (f64, f64) = (143.8503, -37.5622);

    /// The Web Mercator origin.
    pub const ORIGIN_3857: (f64, f64) = (0.0, 0.0);
}

/// GetFeatureInfo HTML bodies.
pub mod html {
    /// Layer discovery response for the reference site.
    ///
    /// Reports 100qa, 105utaf, 111lta and 113cps in non-sorted order, with
    /// mixed case and the basement left out.
    pub const SITE_LAYERS: &str = r#"<!DOCTYPE html>
<html>
<head><title>Geoserver GetFeatureInfo output</title></head>
<body>
<div class="feature">
  <div class="aquifer-id">111LTA</div>
  <div class="aquifer-name">Lower Tertiary Aquifer</div>
</div>
<div class="feature">
  <div class="aquifer-id">100QA</div>
  <div class="aquifer-name">Quaternary Aquifer</div>
</div>
<div class="feature">
  <div class="aquifer-id">113CPS</div>
  <div class="aquifer-name">Cretaceous and Permian Sediments</div>
</div>
<div class="feature">
  <div class="aquifer-id">105utaf</div>
  <div class="aquifer-name">Upper Tertiary Aquifer (fluvial)</div>
</div>
</body>
</html>
"#;

    /// Attribute rows for the layers of [`SITE_LAYERS`] plus the basement.
    ///
    /// Normalizes to 100qa 12.5, 105utaf 42.5, 111lta 1092.75, 114bse 1292.75;
    /// 113cps reports the no-data sentinel with zero thickness and is dropped.
    pub const SITE_AQUIFER_INFO: &str = r#"<html>
<body>
<div class="layer">
  <div class="row"><div class="label">Aqdepth 100</div><div class="value">0</div></div>
  <div class="row"><div class="label">Elevtop 100</div><div class="value">410.0</div></div>
  <div class="row"><div class="label">Thickness 100</div><div class="value">12.5</div></div>
</div>
<div class="layer">
  <div class="row"><div class="label">Aqdepth 105</div><div class="value">12.5</div></div>
  <div class="row"><div class="label">Thickness 105</div><div class="value">30</div></div>
  <div class="row"><div class="label">Elevbottom 105</div><div class="value">n/a</div></div>
</div>
<div class="layer">
  <div class="row"><div class="label">Aqdepth 111</div><div class="value">42.5</div></div>
  <div class="row"><div class="label">Thickness 111</div><div class="value">1,050.25</div></div>
</div>
<div class="layer">
  <div class="row"><div class="label">Aqdepth 113</div><div class="value">-9999</div></div>
  <div class="row"><div class="label">Thickness 113</div><div class="value">0</div></div>
</div>
<div class="layer">
  <div class="row"><div class="label">Aqdepth 114</div><div class="value">1,092.75</div></div>
  <div class="row"><div class="label">Thickness 114</div><div class="value">35.2</div></div>
  <div class="row"><div class="label">Aqdepth</div><div class="value">1</div></div>
  <div class="row"><div class="label">Notes 999</div><div class="value">7</div></div>
</div>
</body>
</html>
"#;

    /// Layer discovery response for a site without the target aquifer.
    pub const NO_TARGET_LAYERS: &str = r#"<html><body>
<div class="aquifer-id">100qa</div>
<div class="aquifer-id">103utqd</div>
</body></html>
"#;

    /// Attribute rows matching [`NO_TARGET_LAYERS`].
    pub const NO_TARGET_AQUIFER_INFO: &str = r#"<html><body>
<div class="row"><div>Aqdepth 100</div><div>0</div></div>
<div class="row"><div>Thickness 100</div><div>8</div></div>
<div class="row"><div>Aqdepth 103</div><div>8</div></div>
<div class="row"><div>Thickness 103</div><div>22</div></div>
<div class="row"><div>Aqdepth 114</div><div>30</div></div>
</body></html>
"#;

    /// Raster feature info reporting a 7.85 m depth to the water table.
    pub const WATERTABLE: &str = r#"<html>
<body>
<table class="featureInfo">
  <caption class="featureInfo">vaf_depth_watertable_swl100_raw_3857</caption>
  <tr><th>Attribute</th><th>Value</th></tr>
  <tr><td>Depth to watertable</td><td>7.85 m</td></tr>
</table>
</body>
</html>
"#;

    /// Water table response without the labeled cell.
    pub const WATERTABLE_MISSING: &str = r#"<html><body>
<table class="featureInfo"><tr><th>Attribute</th><th>Value</th></tr></table>
</body></html>
"#;

    /// Water table response with a non-numeric value.
    pub const WATERTABLE_NO_DATA: &str = r#"<html><body>
<table class="featureInfo"><tr><td>Depth to watertable</td><td>No data</td></tr></table>
</body></html>
"#;

    /// Build an attribute-row body from (label, value) pairs.
    pub fn attribute_rows(rows: &[(&str, &str)]) -> String {
        let mut body = String::from("<html><body>\n");
        for (label, value) in rows {
            body.push_str(&format!(
                "<div class=\"row\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>\n",
                label, value
            ));
        }
        body.push_str("</body></html>\n");
        body
    }

    /// Build a layer discovery body from raw identifiers.
    pub fn layer_ids(ids: &[&str]) -> String {
        let mut body = String::from("<html><body>\n");
        for id in ids {
            body.push_str(&format!("<div class=\"aquifer-id\">{}</div>\n", id));
        }
        body.push_str("</body></html>\n");
        body
    }
}

#[cfg(test)]
mod tests {
    use super::html::*;

    #[test]
    fn test_builders_emit_markers() {
        let body = attribute_rows(&[("Aqdepth 100", "1")]);
        assert!(body.contains("class=\"row\""));
        assert!(body.contains("Aqdepth 100"));

        let body = layer_ids(&["100qa", "111lta"]);
        assert_eq!(body.matches("aquifer-id").count(), 2);
    }
}
