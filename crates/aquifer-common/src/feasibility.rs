//! Decide whether a wellbore calculation can run on a depth table.

use serde::{Deserialize, Serialize};

use crate::{AquiferError, AquiferLayerCode, DepthTable};

/// Layers accepted as the shallowest ("top") aquifer.
pub const SURFACE_AQUIFERS: [AquiferLayerCode; 2] =
    [AquiferLayerCode::Qa100, AquiferLayerCode::Utqa102];

/// Layer the bore is designed to reach (Lower Tertiary Aquifer).
pub const TARGET_AQUIFER: AquiferLayerCode = AquiferLayerCode::Lta111;

pub const REASON_EMPTY: &str = "no aquifer layer data";
pub const REASON_TOP_NOT_SURFACE: &str = "top layer is not a surface aquifer";
pub const REASON_TARGET_ABSENT: &str = "target layer absent";

/// Outcome of [`assess`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub feasible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_aquifer_layer: Option<AquiferLayerCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_aquifer_layer: Option<AquiferLayerCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FeasibilityResult {
    fn infeasible(reason: &str) -> Self {
        Self {
            feasible: false,
            top_aquifer_layer: None,
            target_aquifer_layer: None,
            reason: Some(reason.to_string()),
        }
    }

    /// Convert into the resolved (top, target) pair, or an infeasible-location error.
    pub fn into_layers(self) -> Result<(AquiferLayerCode, AquiferLayerCode), AquiferError> {
        match (self.feasible, self.top_aquifer_layer, self.target_aquifer_layer) {
            (true, Some(top), Some(target)) => Ok((top, target)),
            _ => Err(AquiferError::InfeasibleLocation {
                reason: self.reason.unwrap_or_else(|| REASON_EMPTY.to_string()),
            }),
        }
    }
}

/// Check the table against the fixed surface and target policy.
///
/// Rules, in order: the table is non-empty, row 0 is a surface aquifer,
/// and the target aquifer is present somewhere in the table.
pub fn assess(table: &DepthTable) -> FeasibilityResult {
    let Some(top) = table.top() else {
        return FeasibilityResult::infeasible(REASON_EMPTY);
    };

    if !SURFACE_AQUIFERS.contains(&top.layer_code) {
        return FeasibilityResult::infeasible(REASON_TOP_NOT_SURFACE);
    }

    if !table.contains(TARGET_AQUIFER) {
        return FeasibilityResult::infeasible(REASON_TARGET_ABSENT);
    }

    FeasibilityResult {
        feasible: true,
        top_aquifer_layer: Some(top.layer_code),
        target_aquifer_layer: Some(TARGET_AQUIFER),
        reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DepthTableRow;
    use AquiferLayerCode::*;

    fn table(codes: &[AquiferLayerCode]) -> DepthTable {
        DepthTable::new(
            codes
                .iter()
                .enumerate()
                .map(|(i, code)| DepthTableRow {
                    layer_code: *code,
                    is_aquifer: code.is_aquifer(),
                    depth_to_base: 10.0 * (i + 1) as f64,
                })
                .collect(),
        )
    }

    #[test]
    fn test_empty_table() {
        let result = assess(&DepthTable::default());
        assert!(!result.feasible);
        assert_eq!(result.reason.as_deref(), Some("no aquifer layer data"));
    }

    #[test]
    fn test_feasible_table() {
        let result = assess(&table(&[Qa100, Lta111, Bse114]));
        assert!(result.feasible);
        assert_eq!(result.top_aquifer_layer, Some(Qa100));
        assert_eq!(result.target_aquifer_layer, Some(Lta111));
        assert_eq!(result.reason, None);
        assert_eq!(result.into_layers().unwrap(), (Qa100, Lta111));
    }

    #[test]
    fn test_second_surface_code_accepted() {
        let result = assess(&table(&[Utqa102, Utqd103, Lta111, Bse114]));
        assert!(result.feasible);
        assert_eq!(result.top_aquifer_layer, Some(Utqa102));
    }

    #[test]
    fn test_top_not_surface() {
        let result = assess(&table(&[Utb101, Lta111, Bse114]));
        assert!(!result.feasible);
        assert_eq!(result.reason.as_deref(), Some(REASON_TOP_NOT_SURFACE));
    }

    #[test]
    fn test_target_absent() {
        let result = assess(&table(&[Qa100, Lmta109, Bse114]));
        assert_eq!(result.reason.as_deref(), Some(REASON_TARGET_ABSENT));

        let err = result.into_layers().unwrap_err();
        assert!(matches!(err, AquiferError::InfeasibleLocation { ref reason } if reason == REASON_TARGET_ABSENT));
        assert_eq!(err.http_status_code(), 400);
    }
}
