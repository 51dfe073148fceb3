//! Parsing of recorded-style GetFeatureInfo bodies.

use aquifer_common::{normalize, AquiferError, AquiferLayerCode, RawResponse};
use test_utils::assert_approx_eq;
use test_utils::fixtures::html;
use wms_protocol::{layer_list_string, parse_attribute_rows, parse_layer_list, parse_scalar_depth};

use AquiferLayerCode::*;

#[test]
fn test_site_layer_list() {
    let layers = parse_layer_list(&RawResponse::ok(html::SITE_LAYERS)).unwrap();
    assert_eq!(layers, vec![Qa100, Utaf105, Lta111, Cps113, Bse114]);
    assert_eq!(
        layer_list_string(&layers),
        "vaf_100qa_group,vaf_105utaf_group,vaf_111lta_group,vaf_113cps_group,vaf_114bse_group"
    );
}

#[test]
fn test_basement_is_always_last() {
    for ids in [
        vec![],
        vec!["114BSE"],
        vec!["114bse", "100qa", "109lmta"],
        vec!["112ltbb", "112ltba", "112ltb"],
    ] {
        let body = html::layer_ids(&ids);
        let layers = parse_layer_list(&RawResponse::ok(body)).unwrap();
        assert_eq!(layers.last(), Some(&Bse114));
        assert_eq!(layers.iter().filter(|c| c.is_basement()).count(), 1);
    }
}

#[test]
fn test_basalt_stages_sort_by_identifier() {
    let body = html::layer_ids(&["112ltbb", "112ltba", "112ltb"]);
    let layers = parse_layer_list(&RawResponse::ok(body)).unwrap();
    assert_eq!(layers, vec![Ltb112, Ltba112, Ltbb112, Bse114]);
}

#[test]
fn test_site_attribute_rows() {
    let raw = parse_attribute_rows(&RawResponse::ok(html::SITE_AQUIFER_INFO)).unwrap();
    let codes: Vec<_> = raw.iter().map(|(code, _)| code).collect();
    assert_eq!(codes, vec![Qa100, Utaf105, Lta111, Cps113, Bse114]);

    let qa = raw.fields(Qa100).unwrap();
    assert_eq!(qa.get("Elevtop"), Some(&410.0));

    let utaf = raw.fields(Utaf105).unwrap();
    assert!(utaf.get("Elevbottom").is_none());

    let cps = raw.fields(Cps113).unwrap();
    assert_eq!(cps.get("Aqdepth"), Some(&0.0));

    let bse = raw.fields(Bse114).unwrap();
    assert_eq!(bse.get("Aqdepth"), Some(&1092.75));
    assert_eq!(bse.get("Thickness"), Some(&35.2));
}

#[test]
fn test_site_rows_normalize() {
    let raw = parse_attribute_rows(&RawResponse::ok(html::SITE_AQUIFER_INFO)).unwrap();
    let table = normalize(&raw);

    let rows: Vec<_> = table
        .rows()
        .iter()
        .map(|r| (r.layer_code, r.depth_to_base))
        .collect();
    assert_eq!(
        rows,
        vec![
            (Qa100, 12.5),
            (Utaf105, 42.5),
            (Lta111, 1092.75),
            (Bse114, 1292.75),
        ]
    );
}

#[test]
fn test_numeric_code_112_maps_to_generic_basalt() {
    let body = html::attribute_rows(&[("Aqdepth 112", "60"), ("Thickness 112", "15")]);
    let raw = parse_attribute_rows(&RawResponse::ok(body)).unwrap();
    assert!(raw.fields(Ltb112).is_some());
    assert!(raw.fields(Ltba112).is_none());
}

#[test]
fn test_sentinel_only_matches_exactly() {
    let body = html::attribute_rows(&[
        ("Aqdepth 107", "-9999"),
        ("Thickness 107", "-9,999.5"),
        ("Aqdepth 108", "-9999.0"),
    ]);
    let raw = parse_attribute_rows(&RawResponse::ok(body)).unwrap();

    let umta = raw.fields(Umta107).unwrap();
    assert_eq!(umta.get("Aqdepth"), Some(&0.0));
    assert_eq!(umta.get("Thickness"), Some(&-9999.5));
    assert_eq!(raw.fields(Umtd108).unwrap().get("Aqdepth"), Some(&0.0));
}

#[test]
fn test_non_finite_values_are_skipped() {
    let body = html::attribute_rows(&[("Aqdepth 109", "NaN"), ("Thickness 109", "inf")]);
    let raw = parse_attribute_rows(&RawResponse::ok(body)).unwrap();
    assert!(raw.fields(Lmta109).unwrap().is_empty());
}

#[test]
fn test_watertable_fixtures() {
    let depth = parse_scalar_depth(&RawResponse::ok(html::WATERTABLE)).unwrap();
    assert_approx_eq!(depth, 7.85, 1e-12);

    let err = parse_scalar_depth(&RawResponse::ok(html::WATERTABLE_MISSING)).unwrap_err();
    assert!(matches!(err, AquiferError::MissingValue(_)));

    let err = parse_scalar_depth(&RawResponse::ok(html::WATERTABLE_NO_DATA)).unwrap_err();
    assert!(matches!(err, AquiferError::NoNumericValue(ref v) if v == "No data"));
}

#[test]
fn test_watertable_first_number_wins() {
    let body = "<table><tr><td>Depth to watertable</td><td>approx. 3 to 5 m</td></tr></table>";
    assert_eq!(parse_scalar_depth(&RawResponse::ok(body)).unwrap(), 3.0);
}
