//! depth-profile CLI
//!
//! Resolves the aquifer depth table, water table depth and calculation
//! feasibility for a single point and prints them as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use depth_profile::{
    AquiferProfilePipeline, CacheBackend, HttpTransport, ProfileQuery, ServiceConfig,
};
use storage::{CacheGateway, MemoryResponseStore, RedisResponseStore};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CacheArg {
    Redis,
    Memory,
    Disabled,
}

impl From<CacheArg> for CacheBackend {
    fn from(arg: CacheArg) -> Self {
        match arg {
            CacheArg::Redis => CacheBackend::Redis,
            CacheArg::Memory => CacheBackend::Memory,
            CacheArg::Disabled => CacheBackend::Disabled,
        }
    }
}

/// Aquifer depth profile lookup
#[derive(Parser, Debug)]
#[command(name = "depth-profile")]
#[command(about = "Resolve the aquifer depth profile of a point in Victoria")]
#[command(allow_negative_numbers = true)]
struct Args {
    /// First coordinate, in the axis order of --crs (latitude for wgs84)
    first: f64,

    /// Second coordinate (longitude for wgs84)
    second: f64,

    /// CRS of the coordinates (wgs84, CRS:84, EPSG:4326, EPSG:3857, EPSG:28355, ...)
    #[arg(long, default_value = "wgs84")]
    crs: String,

    /// Sampling resolution in meters per pixel
    #[arg(long, default_value = "100")]
    resolution: f64,

    /// Pixel window width
    #[arg(long, default_value = "100")]
    width: u32,

    /// Pixel window height
    #[arg(long, default_value = "100")]
    height: u32,

    /// YAML configuration file
    #[arg(short, long, env = "DEPTH_PROFILE_CONFIG")]
    config: Option<PathBuf>,

    /// GetFeatureInfo endpoint
    #[arg(long, env = "VAF_WMS_URL")]
    wms_url: Option<String>,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Response cache backend
    #[arg(long, value_enum, env = "DEPTH_PROFILE_CACHE")]
    cache: Option<CacheArg>,

    /// Upstream request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

impl Args {
    fn service_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::load(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(url) = &self.wms_url {
            config.wms_base_url = url.clone();
        }
        if let Some(url) = &self.redis_url {
            config.cache.redis_url = url.clone();
        }
        if let Some(cache) = self.cache {
            config.cache.backend = cache.into();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

async fn build_cache(config: &ServiceConfig) -> Result<CacheGateway> {
    let gateway = match config.cache.backend {
        CacheBackend::Redis => {
            let store = RedisResponseStore::connect(&config.cache.redis_url)
                .await
                .context("Failed to connect to the response cache")?;
            CacheGateway::new(Arc::new(store))
        }
        CacheBackend::Memory => {
            CacheGateway::new(Arc::new(MemoryResponseStore::new(config.cache.max_entries)))
        }
        CacheBackend::Disabled => CacheGateway::disabled(),
    };

    Ok(gateway.with_ttl(config.cache.ttl()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = args.service_config()?;
    info!(
        wms_base_url = %config.wms_base_url,
        cache = ?config.cache.backend,
        timeout_secs = config.request_timeout_secs,
        "Starting depth-profile lookup"
    );

    let transport = HttpTransport::from_config(&config)?;
    let cache = build_cache(&config).await?;
    let pipeline = AquiferProfilePipeline::new(Arc::new(transport), cache)
        .with_base_url(config.wms_base_url.clone());

    let query = ProfileQuery::new((args.first, args.second), args.crs.clone())
        .with_resolution(args.resolution)
        .with_pixels(args.width, args.height);

    let site = pipeline.resolve_site(&query).await?;

    let output = serde_json::json!({
        "depth_table": site.depth_table.to_columns(),
        "watertable_depth": site.watertable_depth,
        "feasibility": site.feasibility,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
