//! Aquifer depth-profile service.
//!
//! Resolves, for a point in Victoria, the ordered table of aquifer layers
//! with their depth to base and the depth to the water table, by querying
//! the Victorian Aquifer Framework WMS through a shared response cache.

pub mod calculation;
pub mod config;
pub mod pipeline;
pub mod transport;

pub use calculation::{
    CalculationError, CalculationInput, InitialInputValues, WellCalculator, WellboreError,
    WellboreOutcome, WellboreService,
};
pub use config::{CacheBackend, CacheConfig, ConfigError, ServiceConfig};
pub use pipeline::{AquiferProfilePipeline, ProfileError, ProfileQuery, SiteProfile};
pub use transport::{HttpTransport, Transport};
