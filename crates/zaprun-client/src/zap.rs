//! HTTP client for the ZAP daemon's JSON API.

use crate::api::ScannerApi;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use zaprun_core::{AlertRecord, Progress, ScanId, ScannerConfig};

const SPIDER_SCAN: &str = "spider/action/scan";
const SPIDER_STATUS: &str = "spider/view/status";
const CORE_ALERTS: &str = "core/view/alerts";

const API_KEY_HEADER: &str = "X-ZAP-API-Key";

/// Client for a running ZAP daemon.
///
/// Holds one pooled reqwest client; cloning is cheap.
#[derive(Debug, Clone)]
pub struct ZapClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ZapClient {
    /// Create a client from scanner connection settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        Self::with_base_url(
            config.base_url(),
            config.api_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Create a client for an explicit base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/JSON/{endpoint}/", self.base_url)
    }

    /// Issue a GET against a JSON API endpoint and decode the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        tracing::debug!("GET {} {:?}", endpoint, params);

        let response = self
            .client
            .get(self.endpoint_url(endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::parse(endpoint, e.to_string()))
    }
}

#[async_trait]
impl ScannerApi for ZapClient {
    async fn start_spider(&self, url: &str) -> Result<ScanId> {
        let response: SpiderScanResponse = self.get_json(SPIDER_SCAN, &[("url", url)]).await?;
        ScanId::new(response.scan).map_err(|e| ClientError::parse(SPIDER_SCAN, e.to_string()))
    }

    async fn spider_status(&self, scan_id: &ScanId) -> Result<Progress> {
        let response: SpiderStatusResponse = self
            .get_json(SPIDER_STATUS, &[("scanId", scan_id.as_str())])
            .await?;
        response
            .status
            .parse()
            .map_err(|e: zaprun_core::ZaprunError| ClientError::parse(SPIDER_STATUS, e.to_string()))
    }

    async fn alerts(&self, base_url: &str) -> Result<Vec<AlertRecord>> {
        let response: AlertsResponse = self.get_json(CORE_ALERTS, &[("baseurl", base_url)]).await?;
        Ok(response.alerts)
    }
}

// ZAP API response envelopes

#[derive(Debug, Deserialize)]
struct SpiderScanResponse {
    scan: String,
}

#[derive(Debug, Deserialize)]
struct SpiderStatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct AlertsResponse {
    alerts: Vec<AlertRecord>,
}
