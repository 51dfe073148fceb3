//! HTTP transport for upstream GetFeatureInfo requests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use metrics::{counter, histogram};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use aquifer_common::{AquiferError, AquiferResult, RawResponse};

use crate::config::ServiceConfig;

/// Issues a single GET per call and reports the outcome.
///
/// Implementations do not retry; non-2xx statuses are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> AquiferResult<RawResponse>;
}

/// reqwest-backed transport with a bounded request timeout.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(
        user_agent: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> AquiferResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                AquiferError::InvalidQuery(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    pub fn from_config(config: &ServiceConfig) -> AquiferResult<Self> {
        Self::new(
            &config.user_agent,
            config.request_timeout(),
            config.connect_timeout(),
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, url), fields(url = %url))]
    async fn fetch(&self, url: &str) -> AquiferResult<RawResponse> {
        let started_at = Utc::now();
        let start = Instant::now();
        debug!(started_at = %started_at.to_rfc3339(), "Sending GetFeatureInfo request");

        let result = self.client.get(url).send().await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let err = classify(url, e);
                record_failure(&err, start);
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let err = classify(url, e);
                record_failure(&err, start);
                return Err(err);
            }
        };

        let elapsed = start.elapsed();
        histogram!("aquifer_wms_request_duration_seconds").record(elapsed.as_secs_f64());

        if !(200..300).contains(&status) {
            let err = AquiferError::http_status(url, status, &body);
            record_failure(&err, start);
            return Err(err);
        }

        info!(
            status = status,
            started_at = %started_at.to_rfc3339(),
            finished_at = %Utc::now().to_rfc3339(),
            elapsed_ms = elapsed.as_millis() as u64,
            bytes = body.len(),
            "GetFeatureInfo request completed"
        );

        Ok(RawResponse::new(status, body))
    }
}

fn classify(url: &str, err: reqwest::Error) -> AquiferError {
    if err.is_timeout() {
        AquiferError::Timeout {
            url: url.to_string(),
        }
    } else {
        AquiferError::Transport {
            url: url.to_string(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn record_failure(err: &AquiferError, start: Instant) {
    counter!("aquifer_wms_request_errors_total", "kind" => err.kind()).increment(1);
    warn!(
        error = %err,
        kind = err.kind(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        finished_at = %Utc::now().to_rfc3339(),
        "GetFeatureInfo request failed"
    );
}
