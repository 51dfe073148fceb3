//! Depth-profile resolution pipeline.
//!
//! Point → bbox → GetFeatureInfo request → cache → transport → parse →
//! normalize. The depth-table path issues two requests in sequence (layer
//! discovery, then attributes); the water table path issues one.

use std::collections::BTreeMap;
use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use aquifer_common::{
    assess, normalize, AquiferError, AquiferResult, BBoxParams, DepthTable, FeasibilityResult,
    GeoPoint, QueryWindow, RawResponse,
};
use storage::CacheGateway;
use wms_protocol::{
    getfeatureinfo, parse_attribute_rows, parse_layer_list, parse_scalar_depth,
    WmsRequestVariant, DEFAULT_BASE_URL,
};

use crate::transport::Transport;

/// Default sampling resolution in meters per pixel.
pub const DEFAULT_MIN_RESOLUTION: f64 = 100.0;
/// Default pixel window.
pub const DEFAULT_PIXELS: (u32, u32) = (100, 100);
/// Default CRS of query coordinates.
pub const DEFAULT_CRS: &str = "wgs84";

/// Validated inbound query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileQuery {
    pub coordinates: (f64, f64),
    pub crs_type: String,
    pub min_resolution: f64,
    pub pixels: (u32, u32),
}

impl ProfileQuery {
    pub fn new(coordinates: (f64, f64), crs_type: impl Into<String>) -> Self {
        Self {
            coordinates,
            crs_type: crs_type.into(),
            min_resolution: DEFAULT_MIN_RESOLUTION,
            pixels: DEFAULT_PIXELS,
        }
    }

    pub fn with_resolution(mut self, min_resolution: f64) -> Self {
        self.min_resolution = min_resolution;
        self
    }

    pub fn with_pixels(mut self, width: u32, height: u32) -> Self {
        self.pixels = (width, height);
        self
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.coordinates, self.crs_type.clone())
    }

    pub fn window(&self) -> AquiferResult<QueryWindow> {
        QueryWindow::new(self.min_resolution, self.pixels.0, self.pixels.1)
    }

    /// Bbox and sample pixel for this query, recomputed on every call.
    pub fn bbox_params(&self) -> AquiferResult<BBoxParams> {
        let window = self.window()?;
        Ok(projection::resolve(&self.point(), &window)?)
    }
}

/// Failure of a pipeline entry point, carrying the original cause.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Error fetching depth table: {source}")]
    DepthTable {
        #[source]
        source: AquiferError,
    },

    #[error("Error fetching watertable depth: {source}")]
    Watertable {
        #[source]
        source: AquiferError,
    },
}

impl ProfileError {
    /// The underlying pipeline error.
    pub fn cause(&self) -> &AquiferError {
        match self {
            ProfileError::DepthTable { source } | ProfileError::Watertable { source } => source,
        }
    }

    pub fn http_status_code(&self) -> u16 {
        self.cause().http_status_code()
    }
}

/// Depth table, water table depth and feasibility of one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteProfile {
    pub depth_table: DepthTable,
    pub watertable_depth: f64,
    pub feasibility: FeasibilityResult,
}

/// Resolves aquifer depth profiles against the upstream WMS.
///
/// Holds no per-request state; one instance serves any number of
/// concurrent queries.
#[derive(Clone)]
pub struct AquiferProfilePipeline {
    transport: Arc<dyn Transport>,
    cache: CacheGateway,
    base_url: String,
}

impl AquiferProfilePipeline {
    pub fn new(transport: Arc<dyn Transport>, cache: CacheGateway) -> Self {
        Self {
            transport,
            cache,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ordered shallow-to-deep depth table for the query point.
    #[instrument(skip(self), fields(crs = %query.crs_type))]
    pub async fn resolve_depth_table(&self, query: &ProfileQuery) -> Result<DepthTable, ProfileError> {
        self.depth_table(query)
            .await
            .map_err(|source| pipeline_failure("depth_table", source))
            .map_err(|source| ProfileError::DepthTable { source })
    }

    /// Depth to the water table at the query point, in meters.
    #[instrument(skip(self), fields(crs = %query.crs_type))]
    pub async fn resolve_watertable_depth(&self, query: &ProfileQuery) -> Result<f64, ProfileError> {
        self.watertable_depth(query)
            .await
            .map_err(|source| pipeline_failure("watertable_depth", source))
            .map_err(|source| ProfileError::Watertable { source })
    }

    /// Both pipelines run concurrently, followed by the feasibility check.
    pub async fn resolve_site(&self, query: &ProfileQuery) -> Result<SiteProfile, ProfileError> {
        let (depth_table, watertable_depth) = tokio::try_join!(
            self.resolve_depth_table(query),
            self.resolve_watertable_depth(query)
        )?;

        let feasibility = assess(&depth_table);
        info!(
            layers = depth_table.len(),
            watertable_depth = watertable_depth,
            feasible = feasibility.feasible,
            "Resolved site profile"
        );

        Ok(SiteProfile {
            depth_table,
            watertable_depth,
            feasibility,
        })
    }

    async fn depth_table(&self, query: &ProfileQuery) -> AquiferResult<DepthTable> {
        let bbox = query.bbox_params()?;

        let response = self.request(&WmsRequestVariant::Layers, &bbox).await?;
        let layers = parse_layer_list(&response)?;
        debug!(layers = ?layers, "Discovered aquifer layers");

        let variant = WmsRequestVariant::aquifer_info(&layers);
        let response = self.request(&variant, &bbox).await?;
        let raw = parse_attribute_rows(&response)?;

        let table = normalize(&raw);
        let filtered = raw.len().saturating_sub(table.len());
        if filtered > 0 {
            counter!("aquifer_filtered_layers_total").increment(filtered as u64);
        }

        info!(
            rows = table.len(),
            filtered = filtered,
            "Resolved depth table"
        );
        Ok(table)
    }

    async fn watertable_depth(&self, query: &ProfileQuery) -> AquiferResult<f64> {
        let bbox = query.bbox_params()?;
        let response = self.request(&WmsRequestVariant::WatertableDepth, &bbox).await?;
        let depth = parse_scalar_depth(&response)?;
        info!(watertable_depth = depth, "Resolved watertable depth");
        Ok(depth)
    }

    async fn request(
        &self,
        variant: &WmsRequestVariant,
        bbox: &BBoxParams,
    ) -> AquiferResult<RawResponse> {
        let params = getfeatureinfo::build(variant, bbox, &BTreeMap::new());
        let url = params.to_url(&self.base_url)?;
        debug!(variant = variant.name(), url = %url, "GetFeatureInfo request");

        self.cache
            .get_or_fetch(&params, || self.transport.fetch(&url))
            .await
    }
}

fn pipeline_failure(stage: &'static str, err: AquiferError) -> AquiferError {
    counter!("aquifer_pipeline_errors_total", "stage" => stage, "kind" => err.kind())
        .increment(1);
    error!(stage = stage, kind = err.kind(), error = %err, "Pipeline failed");
    err
}
