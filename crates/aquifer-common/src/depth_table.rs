//! Depth table normalization.
//!
//! Turns the per-layer attribute records scraped from the aquifer info query
//! into an ordered table of (layer, is-aquifer, depth-to-base) rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::layer::fields;
use crate::{AquiferError, AquiferLayerCode, AquiferResult};

/// Value the service reports when a layer has no data.
pub const NO_DATA_SENTINEL: f64 = -9999.0;

/// Nominal basement thickness in meters; reported values are ignored.
pub const BASEMENT_THICKNESS: f64 = 200.0;

/// Field name to value for a single layer.
pub type LayerFields = BTreeMap<String, f64>;

/// Parsed attribute records keyed by layer, iterated shallow to deep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawLayerAttributes {
    layers: BTreeMap<AquiferLayerCode, LayerFields>,
}

impl RawLayerAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one field value, creating the layer entry on first use.
    pub fn insert(&mut self, code: AquiferLayerCode, field: impl Into<String>, value: f64) {
        self.layers
            .entry(code)
            .or_default()
            .insert(field.into(), value);
    }

    /// Register a layer without any fields yet.
    pub fn touch(&mut self, code: AquiferLayerCode) {
        self.layers.entry(code).or_default();
    }

    pub fn fields(&self, code: AquiferLayerCode) -> Option<&LayerFields> {
        self.layers.get(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AquiferLayerCode, &LayerFields)> {
        self.layers.iter().map(|(code, f)| (*code, f))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// One normalized layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthTableRow {
    pub layer_code: AquiferLayerCode,
    pub is_aquifer: bool,
    /// Cumulative depth from surface to the bottom of the layer, meters
    pub depth_to_base: f64,
}

/// Ordered layer table; row 0 is the shallowest ("top") layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthTable {
    rows: Vec<DepthTableRow>,
}

impl DepthTable {
    pub fn new(rows: Vec<DepthTableRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DepthTableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The shallowest row.
    pub fn top(&self) -> Option<&DepthTableRow> {
        self.rows.first()
    }

    pub fn contains(&self, code: AquiferLayerCode) -> bool {
        self.rows.iter().any(|row| row.layer_code == code)
    }

    pub fn row(&self, code: AquiferLayerCode) -> Option<&DepthTableRow> {
        self.rows.iter().find(|row| row.layer_code == code)
    }

    pub fn layer_codes(&self) -> impl Iterator<Item = AquiferLayerCode> + '_ {
        self.rows.iter().map(|row| row.layer_code)
    }

    /// Column-oriented form consumed by the wellbore calculation engine.
    pub fn to_columns(&self) -> DepthTableColumns {
        DepthTableColumns {
            aquifer_layer: self.rows.iter().map(|r| r.layer_code).collect(),
            is_aquifer: self.rows.iter().map(|r| r.is_aquifer).collect(),
            depth_to_base: self.rows.iter().map(|r| r.depth_to_base).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DepthTable {
    type Item = &'a DepthTableRow;
    type IntoIter = std::slice::Iter<'a, DepthTableRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Column-oriented depth table, as exchanged with the calculation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthTableColumns {
    pub aquifer_layer: Vec<AquiferLayerCode>,
    pub is_aquifer: Vec<bool>,
    pub depth_to_base: Vec<f64>,
}

impl DepthTableColumns {
    /// Rebuild the row form; all columns must have the same length.
    pub fn into_table(self) -> AquiferResult<DepthTable> {
        let n = self.aquifer_layer.len();
        if self.is_aquifer.len() != n || self.depth_to_base.len() != n {
            return Err(AquiferError::InvalidQuery(format!(
                "depth table columns differ in length: aquifer_layer={}, is_aquifer={}, depth_to_base={}",
                n,
                self.is_aquifer.len(),
                self.depth_to_base.len()
            )));
        }

        let rows = self
            .aquifer_layer
            .into_iter()
            .zip(self.is_aquifer)
            .zip(self.depth_to_base)
            .map(|((layer_code, is_aquifer), depth_to_base)| DepthTableRow {
                layer_code,
                is_aquifer,
                depth_to_base,
            })
            .collect();

        Ok(DepthTable::new(rows))
    }
}

/// Normalize raw attribute records into a depth table.
///
/// - `Aqdepth` defaults to 0; the no-data sentinel collapses to 0.
/// - Basement thickness is fixed at [`BASEMENT_THICKNESS`].
/// - `depth_to_base = Aqdepth + thickness`.
/// - Any layer other than the surface layer whose depth or thickness is
///   exactly zero is dropped.
/// - Any layer, the surface layer included, whose depth to base comes out
///   negative is dropped.
pub fn normalize(raw: &RawLayerAttributes) -> DepthTable {
    let mut rows = Vec::with_capacity(raw.len());

    for (code, layer_fields) in raw.iter() {
        let mut aqdepth = layer_fields.get(fields::AQDEPTH).copied().unwrap_or(0.0);
        if aqdepth == NO_DATA_SENTINEL {
            aqdepth = 0.0;
        }

        let thickness = if code.is_basement() {
            BASEMENT_THICKNESS
        } else {
            layer_fields.get(fields::THICKNESS).copied().unwrap_or(0.0)
        };

        let depth = aqdepth + thickness;

        if depth < 0.0 {
            warn!(
                layer = %code,
                depth_to_base = depth,
                "Dropped layer with negative depth to base"
            );
            continue;
        }

        if code != AquiferLayerCode::SURFACE && (depth == 0.0 || thickness == 0.0) {
            warn!(
                layer = %code,
                depth_to_base = depth,
                thickness = thickness,
                "Filtered layer"
            );
            continue;
        }

        rows.push(DepthTableRow {
            layer_code: code,
            is_aquifer: code.is_aquifer(),
            depth_to_base: depth,
        });
    }

    debug!(rows = rows.len(), input_layers = raw.len(), "Normalized depth table");
    DepthTable::new(rows)
}
