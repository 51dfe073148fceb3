//! Extraction of aquifer data from GetFeatureInfo HTML responses.
//!
//! The templates published by the aquifer framework service mark their
//! content with CSS classes: `aquifer-id` for discovered layers and `row`
//! for label/value attribute pairs. The water table layer uses a plain
//! two-column table.

use std::str::FromStr;

use aquifer_common::{
    AquiferError, AquiferLayerCode, AquiferResult, RawLayerAttributes, RawResponse,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::html::{self, HtmlElement};

const LAYER_ID_CLASS: &str = "aquifer-id";
const ATTRIBUTE_ROW_CLASS: &str = "row";
const WATERTABLE_LABEL: &str = "Depth to watertable";

/// "Aqdepth 111" -> ("Aqdepth", "111")
static ATTRIBUTE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+)\s+(\d+)").expect("valid attribute label pattern")
});

static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.?\d*)").expect("valid numeric token pattern")
});

fn ensure_success(response: &RawResponse, context: &str) -> AquiferResult<()> {
    if response.is_success() {
        return Ok(());
    }
    error!(
        status = response.status,
        context = context,
        "GetFeatureInfo returned non-success status"
    );
    Err(AquiferError::unexpected_status(response.status, &response.body))
}

/// Layers present under the query point, sorted, with the basement appended.
///
/// Unknown identifiers are logged and dropped. The basement layer is always
/// the final entry, whether or not the service reported it.
pub fn parse_layer_list(response: &RawResponse) -> AquiferResult<Vec<AquiferLayerCode>> {
    ensure_success(response, "layer list")?;

    let doc = html::parse(&response.body);
    let mut tokens: Vec<String> = doc
        .find_all("div", Some(LAYER_ID_CLASS))
        .into_iter()
        .map(|e| e.text().trim().to_lowercase())
        .collect();
    tokens.sort();

    let mut layers = Vec::with_capacity(tokens.len() + 1);
    for token in &tokens {
        match AquiferLayerCode::from_str(token) {
            Ok(code) if code.is_basement() => {}
            Ok(code) => {
                if !layers.contains(&code) {
                    layers.push(code);
                }
            }
            Err(_) => warn!(token = %token, "Ignoring unknown aquifer layer id"),
        }
    }
    layers.push(AquiferLayerCode::BASEMENT);

    debug!(count = layers.len(), "Parsed aquifer layer list");
    Ok(layers)
}

/// Per-layer numeric attributes from label/value row pairs.
///
/// Parsing is best effort: a value that is not a number is logged and
/// skipped for that field only. Rows with an unrecognized label or layer
/// number are ignored.
pub fn parse_attribute_rows(response: &RawResponse) -> AquiferResult<RawLayerAttributes> {
    ensure_success(response, "aquifer info")?;

    let doc = html::parse(&response.body);
    let mut data = RawLayerAttributes::new();

    for row in doc.find_all("div", Some(ATTRIBUTE_ROW_CLASS)) {
        let cols = row.find_all("div", None);
        if cols.len() != 2 {
            continue;
        }
        let label = cols[0].text();
        let label = label.trim();
        let value = cols[1].text();
        let value = value.trim();

        let Some(caps) = ATTRIBUTE_LABEL.captures(label) else {
            continue;
        };
        let field = &caps[1];
        let Some(code) = AquiferLayerCode::from_numeric(&caps[2]) else {
            continue;
        };

        data.touch(code);
        match parse_attribute_value(value) {
            Some(v) if v == aquifer_common::depth_table::NO_DATA_SENTINEL => {
                info!(layer = %code, field = field, "No-data sentinel, treating as 0");
                data.insert(code, field, 0.0);
            }
            Some(v) => data.insert(code, field, v),
            None => {
                warn!(layer = %code, label = label, value = value, "Could not convert value to float");
            }
        }
    }

    debug!(layers = data.len(), "Parsed aquifer attribute rows");
    Ok(data)
}

fn parse_attribute_value(value: &str) -> Option<f64> {
    value
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Numeric value of the cell following the "Depth to watertable" label.
pub fn parse_scalar_depth(response: &RawResponse) -> AquiferResult<f64> {
    ensure_success(response, "watertable depth")?;

    let doc = html::parse(&response.body);
    let cells: Vec<&HtmlElement> = doc.find_all("td", None);

    let value_cell = cells
        .iter()
        .position(|td| td.text().trim() == WATERTABLE_LABEL)
        .and_then(|i| cells.get(i + 1));

    let Some(cell) = value_cell else {
        error!("Depth value not available");
        return Err(AquiferError::MissingValue(format!(
            "no '{}' cell in response",
            WATERTABLE_LABEL
        )));
    };

    let text = cell.text();
    let parsed = NUMERIC_TOKEN
        .find(&text)
        .and_then(|m| m.as_str().parse::<f64>().ok());

    match parsed {
        Some(depth) => {
            debug!(depth = depth, "Parsed watertable depth");
            Ok(depth)
        }
        None => {
            error!(cell = %text.trim(), "No numeric value found");
            Err(AquiferError::NoNumericValue(text.trim().to_string()))
        }
    }
}
