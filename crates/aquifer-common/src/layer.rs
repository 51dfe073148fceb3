//! Victorian Aquifer Framework (VAF) layer reference data.
//!
//! The table is compiled in and never mutated; every lookup borrows from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker contained in the code of the basement layer.
pub const BASEMENT_MARKER: &str = "bse";

/// Attribute field names reported per layer by the aquifer info query.
pub mod fields {
    /// Depth from surface to the top of the layer
    pub const AQDEPTH: &str = "Aqdepth";
    pub const ELEVTOP: &str = "Elevtop";
    pub const THICKNESS: &str = "Thickness";
    pub const ELEVBOTTOM: &str = "Elevbottom";

    /// Human-readable term for a reported field name.
    pub fn surface_term(field: &str) -> Option<&'static str> {
        match field {
            AQDEPTH => Some("Depth to"),
            ELEVTOP => Some("Top Elevation"),
            THICKNESS => Some("Thickness"),
            ELEVBOTTOM => Some("Bottom Elevation"),
            _ => None,
        }
    }
}

/// A known VAF stratigraphic unit.
///
/// Variants are declared shallow to deep, so the derived ordering is the
/// stratigraphic order with the basement last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AquiferLayerCode {
    #[serde(rename = "100qa")]
    Qa100,
    #[serde(rename = "101utb")]
    Utb101,
    #[serde(rename = "102utqa")]
    Utqa102,
    #[serde(rename = "103utqd")]
    Utqd103,
    #[serde(rename = "104utam")]
    Utam104,
    #[serde(rename = "105utaf")]
    Utaf105,
    #[serde(rename = "106utd")]
    Utd106,
    #[serde(rename = "107umta")]
    Umta107,
    #[serde(rename = "108umtd")]
    Umtd108,
    #[serde(rename = "109lmta")]
    Lmta109,
    #[serde(rename = "110lmtd")]
    Lmtd110,
    #[serde(rename = "111lta")]
    Lta111,
    #[serde(rename = "112ltba")]
    Ltba112,
    #[serde(rename = "112ltbb")]
    Ltbb112,
    #[serde(rename = "112ltb")]
    Ltb112,
    #[serde(rename = "113cps")]
    Cps113,
    #[serde(rename = "114bse")]
    Bse114,
}

/// Static reference entry for one layer.
#[derive(Debug, Clone, Copy)]
pub struct LayerInfo {
    pub code: AquiferLayerCode,
    pub id: &'static str,
    pub label: &'static str,
    pub is_aquifer: bool,
}

/// The full reference table, shallow to deep.
pub static LAYER_TABLE: [LayerInfo; 17] = [
    info(AquiferLayerCode::Qa100, "100qa", "Quaternary Alluvium (100)", true),
    info(AquiferLayerCode::Utb101, "101utb", "Upper Tertiary/Quaternary Basalt (101)", false),
    info(AquiferLayerCode::Utqa102, "102utqa", "Upper Tertiary-Quaternary Aquifer (102)", true),
    info(AquiferLayerCode::Utqd103, "103utqd", "Upper Tertiary-Quaternary Aquitard (103)", false),
    info(AquiferLayerCode::Utam104, "104utam", "Upper Tertiary Aquifer (marine) (104)", true),
    info(AquiferLayerCode::Utaf105, "105utaf", "Upper Tertiary Aquifer (fluvial) (105)", true),
    info(AquiferLayerCode::Utd106, "106utd", "Upper Tertiary Aquitard (106)", false),
    info(AquiferLayerCode::Umta107, "107umta", "Upper-Mid Tertiary Aquifer (107)", true),
    info(AquiferLayerCode::Umtd108, "108umtd", "Upper-Mid Tertiary Aquitard (108)", false),
    info(AquiferLayerCode::Lmta109, "109lmta", "Lower-Mid Tertiary Aquifer (109)", true),
    info(AquiferLayerCode::Lmtd110, "110lmtd", "Lower-Mid Tertiary Aquitard (110)", false),
    info(AquiferLayerCode::Lta111, "111lta", "Lower Tertiary Aquifer (111)", true),
    info(AquiferLayerCode::Ltba112, "112ltba", "Lower Tertiary Basalt A stage (112)", false),
    info(AquiferLayerCode::Ltbb112, "112ltbb", "Lower Tertiary Basalt B stage (112)", false),
    info(AquiferLayerCode::Ltb112, "112ltb", "Lower Tertiary Basalt (112)", false),
    info(AquiferLayerCode::Cps113, "113cps", "Cretaceous & Permian Sediments (113)", false),
    info(AquiferLayerCode::Bse114, "114bse", "Cretaceous & Palaeozoic Basement (114)", false),
];

const fn info(
    code: AquiferLayerCode,
    id: &'static str,
    label: &'static str,
    is_aquifer: bool,
) -> LayerInfo {
    LayerInfo {
        code,
        id,
        label,
        is_aquifer,
    }
}

impl AquiferLayerCode {
    /// The surface layer exempt from zero-depth filtering.
    pub const SURFACE: AquiferLayerCode = AquiferLayerCode::Qa100;

    /// The deepest layer, always appended to discovered layer lists.
    pub const BASEMENT: AquiferLayerCode = AquiferLayerCode::Bse114;

    /// Reference entry for this code.
    pub fn info(&self) -> &'static LayerInfo {
        &LAYER_TABLE[*self as usize]
    }

    /// Lower-case identifier, e.g. "100qa".
    pub fn as_str(&self) -> &'static str {
        self.info().id
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn is_aquifer(&self) -> bool {
        self.info().is_aquifer
    }

    pub fn is_basement(&self) -> bool {
        self.as_str().contains(BASEMENT_MARKER)
    }

    /// Resolve the three-digit suffix used in attribute labels ("Aqdepth 111").
    ///
    /// The basalt stages share 112 and resolve to the undivided `112ltb`.
    pub fn from_numeric(num: &str) -> Option<Self> {
        let code = match num {
            "100" => AquiferLayerCode::Qa100,
            "101" => AquiferLayerCode::Utb101,
            "102" => AquiferLayerCode::Utqa102,
            "103" => AquiferLayerCode::Utqd103,
            "104" => AquiferLayerCode::Utam104,
            "105" => AquiferLayerCode::Utaf105,
            "106" => AquiferLayerCode::Utd106,
            "107" => AquiferLayerCode::Umta107,
            "108" => AquiferLayerCode::Umtd108,
            "109" => AquiferLayerCode::Lmta109,
            "110" => AquiferLayerCode::Lmtd110,
            "111" => AquiferLayerCode::Lta111,
            "112" => AquiferLayerCode::Ltb112,
            "113" => AquiferLayerCode::Cps113,
            "114" => AquiferLayerCode::Bse114,
            _ => return None,
        };
        Some(code)
    }

    /// WMS group layer name for this unit, e.g. "vaf_111lta_group".
    pub fn group_layer_name(&self) -> String {
        format!("vaf_{}_group", self.as_str())
    }
}

impl fmt::Display for AquiferLayerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown aquifer layer code: {0}")]
pub struct UnknownLayerCode(pub String);

impl FromStr for AquiferLayerCode {
    type Err = UnknownLayerCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        LAYER_TABLE
            .iter()
            .find(|entry| entry.id == wanted)
            .map(|entry| entry.code)
            .ok_or_else(|| UnknownLayerCode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_discriminant() {
        for (idx, entry) in LAYER_TABLE.iter().enumerate() {
            assert_eq!(entry.code as usize, idx, "{} out of place", entry.id);
            assert_eq!(entry.code.as_str(), entry.id);
        }
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("100QA".parse::<AquiferLayerCode>().unwrap(), AquiferLayerCode::Qa100);
        assert_eq!("112ltbb".parse::<AquiferLayerCode>().unwrap(), AquiferLayerCode::Ltbb112);
        assert!("999zz".parse::<AquiferLayerCode>().is_err());
    }

    #[test]
    fn test_numeric_lookup() {
        assert_eq!(AquiferLayerCode::from_numeric("111"), Some(AquiferLayerCode::Lta111));
        assert_eq!(AquiferLayerCode::from_numeric("112"), Some(AquiferLayerCode::Ltb112));
        assert_eq!(AquiferLayerCode::from_numeric("115"), None);
    }

    #[test]
    fn test_flags() {
        assert!(AquiferLayerCode::Qa100.is_aquifer());
        assert!(AquiferLayerCode::Lta111.is_aquifer());
        assert!(!AquiferLayerCode::Bse114.is_aquifer());
        assert!(AquiferLayerCode::Bse114.is_basement());
        assert!(!AquiferLayerCode::Cps113.is_basement());
    }

    #[test]
    fn test_stratigraphic_order() {
        assert!(AquiferLayerCode::Qa100 < AquiferLayerCode::Lta111);
        assert!(LAYER_TABLE.iter().all(|e| e.code <= AquiferLayerCode::BASEMENT));
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&AquiferLayerCode::Lmta109).unwrap();
        assert_eq!(json, "\"109lmta\"");
        let back: AquiferLayerCode = serde_json::from_str("\"114bse\"").unwrap();
        assert_eq!(back, AquiferLayerCode::Bse114);
    }

    #[test]
    fn test_group_layer_name() {
        assert_eq!(AquiferLayerCode::Lta111.group_layer_name(), "vaf_111lta_group");
        assert_eq!(fields::surface_term("Aqdepth"), Some("Depth to"));
    }
}
