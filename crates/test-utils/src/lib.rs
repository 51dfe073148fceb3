//! Test support shared by the depth-profile crates.
//!
//! Response bodies live in [`fixtures`]; this module carries the float
//! assertions used for depths and projected coordinates, plus a helper for
//! writing throwaway config files.

pub mod fixtures;

use std::io::Write;

/// Temporary file holding `contents`, named `depth-profile-*.{extension}`.
///
/// Removed from disk when dropped.
pub fn temp_config_file(contents: &str, extension: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("depth-profile-")
        .suffix(&format!(".{}", extension))
        .tempfile()
        .expect("create temp config file");
    file.write_all(contents.as_bytes())
        .expect("write temp config file");
    file
}

/// Absolute difference of two values, both widened to f64.
#[doc(hidden)]
pub fn abs_diff(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs()
}

/// Assert two numbers agree within `tolerance`.
///
/// ```ignore
/// assert_approx_eq!(depth, 7.85, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected, tolerance) = ($actual as f64, $expected as f64, $tolerance as f64);
        let diff = $crate::abs_diff(actual, expected);
        assert!(
            diff <= tolerance,
            "values differ: actual {} expected {} (diff {} exceeds tolerance {})",
            actual,
            expected,
            diff,
            tolerance
        );
    }};
}

/// Assert two (x, y) points agree on both axes within `tolerance`.
///
/// ```ignore
/// assert_point_near!(to_web_mercator(&point)?, (16_013_500.0, -4_517_000.0), 0.5);
/// ```
#[macro_export]
macro_rules! assert_point_near {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let actual: (f64, f64) = $actual;
        let expected: (f64, f64) = $expected;
        let tolerance = $tolerance as f64;
        let dx = $crate::abs_diff(actual.0, expected.0);
        let dy = $crate::abs_diff(actual.1, expected.1);
        assert!(
            dx <= tolerance && dy <= tolerance,
            "points differ: actual {:?} expected {:?} (dx {}, dy {}, tolerance {})",
            actual,
            expected,
            dx,
            dy,
            tolerance
        );
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_within_tolerance() {
        assert_approx_eq!(1092.75, 1092.7500001, 1e-6);
        assert_approx_eq!(0u32, 0.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "values differ")]
    fn test_approx_eq_outside_tolerance() {
        assert_approx_eq!(12.5, 12.6, 0.01);
    }

    #[test]
    fn test_point_near() {
        assert_point_near!((100.2, -50.1), (100.0, -50.0), 0.5);
    }

    #[test]
    #[should_panic(expected = "points differ")]
    fn test_point_far_on_one_axis() {
        assert_point_near!((100.0, -49.0), (100.0, -50.0), 0.5);
    }

    #[test]
    fn test_temp_config_file() {
        let file = temp_config_file("request_timeout_secs: 5\n", "yaml");
        let path = file.path().to_path_buf();
        assert!(path.to_string_lossy().ends_with(".yaml"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "request_timeout_secs: 5\n"
        );
    }
}
