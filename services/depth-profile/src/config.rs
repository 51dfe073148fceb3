//! Service configuration.
//!
//! Loaded from an optional YAML file; every field has a default, and the
//! binary overrides individual fields from CLI flags and environment.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use wms_protocol::DEFAULT_BASE_URL;

/// Browser-like user agent sent with every upstream request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration of the depth-profile service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// GetFeatureInfo endpoint of the aquifer framework service
    pub wms_base_url: String,
    pub user_agent: String,
    /// Whole-request timeout for upstream calls
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub cache: CacheConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            wms_base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            cache: CacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub redis_url: String,
    pub ttl_secs: u64,
    /// Entry limit of the in-memory backend
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            ttl_secs: 24 * 60 * 60,
            max_entries: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: ServiceConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        debug!(path = %path.display(), "Loaded service configuration");
        Ok(config)
    }

    /// Reject settings that would leave requests unbounded or unroutable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wms_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("wms_base_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.cache.backend != CacheBackend::Disabled && self.cache.ttl_secs == 0 {
            return Err(ConfigError::Invalid("cache.ttl_secs must be greater than zero".into()));
        }
        if self.cache.backend == CacheBackend::Redis && self.cache.redis_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "cache.redis_url is required for the redis backend".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::temp_config_file;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.cache.ttl(), Duration::from_secs(86_400));
        assert_eq!(config.wms_base_url, "https://geo.cerdi.edu.au/geoserver/vvg/wms");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
request_timeout_secs: 5
cache:
  backend: memory
  max_entries: 50
"#;
        let file = temp_config_file(yaml, "yaml");
        let config = ServiceConfig::load(file.path()).unwrap();

        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.max_entries, 50);
        assert_eq!(config.cache.ttl_secs, 86_400);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_invalid_yaml() {
        let file = temp_config_file("cache: [not, a, map]\n", "yaml");
        let err = ServiceConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ServiceConfig::load(Path::new("/nonexistent/depth-profile.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_validate_rejects_unbounded_requests() {
        let config = ServiceConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServiceConfig {
            wms_base_url: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_cache_ignores_ttl() {
        let mut config = ServiceConfig::default();
        config.cache.backend = CacheBackend::Disabled;
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_ok());
    }
}
