//! Error types for the aquifer profile pipeline.

use thiserror::Error;

/// Result type alias using AquiferError.
pub type AquiferResult<T> = Result<T, AquiferError>;

/// Primary error type for aquifer profile resolution.
///
/// Every variant is scoped to a single resolution request; none of them is
/// fatal to the process.
#[derive(Debug, Error)]
pub enum AquiferError {
    // === Query Errors ===
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Coordinate transform failed: {0}")]
    CoordinateTransform(String),

    // === Upstream Service Errors ===
    #[error("WMS request to {url} failed: {message}")]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("WMS request timed out: {url}")]
    Timeout { url: String },

    #[error("Unexpected WMS response: {0}")]
    Parse(String),

    #[error("Depth value not available: {0}")]
    MissingValue(String),

    #[error("No numeric value found: {0}")]
    NoNumericValue(String),

    // === Storage Errors ===
    #[error("Cache error: {0}")]
    Cache(String),

    // === Business Outcomes ===
    #[error("Calculation cannot be performed at the selected location: {reason}")]
    InfeasibleLocation { reason: String },
}

impl AquiferError {
    /// Build a transport error for a non-success HTTP status.
    pub fn http_status(url: impl Into<String>, status: u16, body: &str) -> Self {
        AquiferError::Transport {
            url: url.into(),
            status: Some(status),
            message: format!("HTTP {}: {}", status, truncate(body, BODY_EXCERPT_CHARS)),
        }
    }

    /// Build a parse error for a response the parser refuses to read.
    ///
    /// The body is cut to the same length as in [`http_status`](Self::http_status).
    pub fn unexpected_status(status: u16, body: &str) -> Self {
        AquiferError::Parse(format!("Error: {}, {}", status, truncate(body, BODY_EXCERPT_CHARS)))
    }

    /// Get the HTTP status code a web layer should answer with.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AquiferError::InvalidQuery(_)
            | AquiferError::CoordinateTransform(_)
            | AquiferError::InfeasibleLocation { .. } => 400,

            AquiferError::Parse(_)
            | AquiferError::MissingValue(_)
            | AquiferError::NoNumericValue(_) => 502,

            AquiferError::Transport { .. } => 503,
            AquiferError::Timeout { .. } => 504,

            AquiferError::Cache(_) => 500,
        }
    }

    /// True when the upstream service answered but with an unexpected shape.
    pub fn is_upstream_data_fault(&self) -> bool {
        matches!(
            self,
            AquiferError::Parse(_) | AquiferError::MissingValue(_) | AquiferError::NoNumericValue(_)
        )
    }

    /// True when the upstream service could not be reached or refused the request.
    pub fn is_transport_fault(&self) -> bool {
        matches!(self, AquiferError::Transport { .. } | AquiferError::Timeout { .. })
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AquiferError::InvalidQuery(_) => "invalid_query",
            AquiferError::CoordinateTransform(_) => "coordinate_transform",
            AquiferError::Transport { .. } => "transport",
            AquiferError::Timeout { .. } => "timeout",
            AquiferError::Parse(_) => "parse",
            AquiferError::MissingValue(_) => "missing_value",
            AquiferError::NoNumericValue(_) => "no_numeric_value",
            AquiferError::Cache(_) => "cache",
            AquiferError::InfeasibleLocation { .. } => "infeasible_location",
        }
    }
}

/// Characters of an upstream body kept in error messages.
const BODY_EXCERPT_CHARS: usize = 200;

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl From<serde_json::Error> for AquiferError {
    fn from(err: serde_json::Error) -> Self {
        AquiferError::Cache(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AquiferError::CoordinateTransform("x".into()).http_status_code(), 400);
        assert_eq!(AquiferError::Parse("x".into()).http_status_code(), 502);
        assert_eq!(
            AquiferError::Timeout { url: "u".into() }.http_status_code(),
            504
        );
        assert_eq!(
            AquiferError::http_status("http://example", 500, "boom").http_status_code(),
            503
        );
    }

    #[test]
    fn test_fault_classification() {
        let garbage = AquiferError::NoNumericValue("n/a".into());
        assert!(garbage.is_upstream_data_fault());
        assert!(!garbage.is_transport_fault());

        let down = AquiferError::http_status("http://example", 502, "");
        assert!(down.is_transport_fault());
        assert!(!down.is_upstream_data_fault());
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(1000);
        let err = AquiferError::http_status("http://example", 500, &body);
        assert!(err.to_string().len() < 400);
    }

    #[test]
    fn test_unexpected_status_keeps_an_excerpt() {
        let err = AquiferError::unexpected_status(404, "Not Found");
        assert!(matches!(err, AquiferError::Parse(ref m) if m == "Error: 404, Not Found"));

        let body = "é".repeat(1000);
        let err = AquiferError::unexpected_status(500, &body);
        match err {
            AquiferError::Parse(m) => {
                assert!(m.starts_with("Error: 500, "));
                assert_eq!(m.chars().filter(|c| *c == 'é').count(), BODY_EXCERPT_CHARS);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
