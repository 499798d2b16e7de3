// src/core/api.rs

//! HTTP/JSON client for the scanning service.
//!
//! Endpoints, relative to the configured base URL:
//! - POST /scans               - create a scan job
//! - GET  /scans/{id}/status   - lifecycle status and progress
//! - GET  /scans/{id}/results  - full scan record
//! - GET  /scans?limit=N       - most recent scans, newest first
//! - GET  /health              - service health

use std::future::Future;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::core::models::{CreatedScan, HealthReport, NewScan, Scan, ScanSummary, StatusReport};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// The operations the dashboard needs from the scanning service.
///
/// Every call is independent; the service owns all scan state and the client
/// only ever re-fetches it.
pub trait ScanApi: Send + Sync + 'static {
    fn create_scan(&self, request: &NewScan) -> impl Future<Output = Result<CreatedScan, ApiError>> + Send;

    fn scan_status(&self, scan_id: &str) -> impl Future<Output = Result<StatusReport, ApiError>> + Send;

    fn scan_results(&self, scan_id: &str) -> impl Future<Output = Result<Scan, ApiError>> + Send;

    fn recent_scans(&self, limit: usize) -> impl Future<Output = Result<Vec<ScanSummary>, ApiError>> + Send;

    fn health(&self) -> impl Future<Output = Result<HealthReport, ApiError>> + Send;
}

/// FastAPI error body.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

pub struct HttpScanApi {
    http: Client,
    base: Url,
}

impl HttpScanApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(format!("ssl-portal-tui/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base: normalize_base(config.api_url.clone()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    /// `scans/{scan_id}/{action}`, with the id percent-encoded as a single
    /// path segment.
    fn scan_endpoint(&self, scan_id: &str, action: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint("scans")?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(scan_id)
            .push(action);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(ErrorBody { detail: serde_json::Value::String(detail) }) => detail,
                Ok(ErrorBody { detail }) => detail.to_string(),
                Err(_) if body.trim().is_empty() => status.canonical_reason().unwrap_or("unknown error").to_string(),
                Err(_) => body,
            };
            warn!(status = status.as_u16(), %message, "Scanning service returned an error.");
            return Err(ApiError::Status { status: status.as_u16(), message });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

impl ScanApi for HttpScanApi {
    async fn create_scan(&self, request: &NewScan) -> Result<CreatedScan, ApiError> {
        let url = self.endpoint("scans")?;
        debug!(%url, host = %request.host, port = request.port, "Creating scan.");
        let response = self.http.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn scan_status(&self, scan_id: &str) -> Result<StatusReport, ApiError> {
        let url = self.scan_endpoint(scan_id, "status")?;
        debug!(%url, "Polling scan status.");
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn scan_results(&self, scan_id: &str) -> Result<Scan, ApiError> {
        let url = self.scan_endpoint(scan_id, "results")?;
        debug!(%url, "Fetching scan results.");
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn recent_scans(&self, limit: usize) -> Result<Vec<ScanSummary>, ApiError> {
        let mut url = self.endpoint("scans")?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        debug!(%url, "Listing recent scans.");
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        let url = self.endpoint("health")?;
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }
}
