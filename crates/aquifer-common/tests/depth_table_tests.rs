//! Normalization and feasibility behaviour over realistic layer stacks.

use aquifer_common::depth_table::{NO_DATA_SENTINEL, BASEMENT_THICKNESS};
use aquifer_common::feasibility::{REASON_TARGET_ABSENT, REASON_TOP_NOT_SURFACE};
use aquifer_common::{assess, normalize, AquiferLayerCode, RawLayerAttributes};
use AquiferLayerCode::*;

fn stack(entries: &[(AquiferLayerCode, f64, f64)]) -> RawLayerAttributes {
    let mut raw = RawLayerAttributes::new();
    for (code, aqdepth, thickness) in entries {
        raw.insert(*code, "Aqdepth", *aqdepth);
        raw.insert(*code, "Thickness", *thickness);
    }
    raw
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_typical_western_district_profile() {
    let raw = stack(&[
        (Qa100, 0.0, 8.5),
        (Utqa102, 8.5, 21.0),
        (Utqd103, 29.5, 14.0),
        (Lta111, 43.5, 60.0),
        (Bse114, 103.5, 0.0),
    ]);

    let table = normalize(&raw);
    let depths: Vec<f64> = table.rows().iter().map(|r| r.depth_to_base).collect();
    assert_eq!(depths, vec![8.5, 29.5, 43.5, 103.5, 303.5]);
    assert_eq!(table.rows().last().unwrap().layer_code, Bse114);
}

#[test]
fn test_sentinel_never_reaches_output() {
    let raw = stack(&[(Qa100, NO_DATA_SENTINEL, 4.0), (Bse114, NO_DATA_SENTINEL, 1.0)]);

    let table = normalize(&raw);
    assert!(table.rows().iter().all(|r| r.depth_to_base >= 0.0));
    assert_eq!(table.row(Qa100).unwrap().depth_to_base, 4.0);
    assert_eq!(table.row(Bse114).unwrap().depth_to_base, BASEMENT_THICKNESS);
}

#[test]
fn test_surface_row_survives_zero_depth() {
    let raw = stack(&[(Qa100, 0.0, 0.0), (Lta111, 0.0, 0.0), (Bse114, 0.0, 0.0)]);

    let codes: Vec<_> = normalize(&raw).layer_codes().collect();
    assert_eq!(codes, vec![Qa100, Bse114]);
}

#[test]
fn test_rows_missing_fields_default_to_zero() {
    let mut raw = RawLayerAttributes::new();
    raw.insert(Qa100, "Elevtop", 220.0);
    raw.insert(Lmta109, "Aqdepth", 50.0);

    let table = normalize(&raw);
    assert_eq!(table.len(), 1);
    assert_eq!(table.top().unwrap().depth_to_base, 0.0);
}

// ============================================================================
// Feasibility on normalized tables
// ============================================================================

#[test]
fn test_normalized_profile_is_feasible() {
    let raw = stack(&[(Qa100, 0.0, 8.0), (Lta111, 30.0, 40.0), (Bse114, 70.0, 0.0)]);

    let result = assess(&normalize(&raw));
    assert!(result.feasible);
    assert_eq!(result.top_aquifer_layer, Some(Qa100));
    assert_eq!(result.target_aquifer_layer, Some(Lta111));
}

#[test]
fn test_filtered_surface_aquifer_makes_site_infeasible() {
    // 102utqa with zero thickness is dropped, leaving the aquitard on top.
    let raw = stack(&[(Utqa102, 0.0, 0.0), (Utqd103, 5.0, 10.0), (Lta111, 15.0, 30.0)]);

    let result = assess(&normalize(&raw));
    assert!(!result.feasible);
    assert_eq!(result.reason.as_deref(), Some(REASON_TOP_NOT_SURFACE));
}

#[test]
fn test_missing_target_after_filtering() {
    let raw = stack(&[(Qa100, 0.0, 5.0), (Lta111, 40.0, 0.0), (Bse114, 40.0, 0.0)]);

    let result = assess(&normalize(&raw));
    assert_eq!(result.reason.as_deref(), Some(REASON_TARGET_ABSENT));
}
