//! HTTP client for the upstream station box service

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use crate::domain::interfaces::HttpFetcher;
use crate::shared::errors::{FetchError, MonitorError};

const BROWSER_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/86.0.4240.111 Safari/537.36";

/// Fetches station listings while looking like a browser ajax call
pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    pub fn new(timeout: Duration) -> Result<Self, MonitorError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let http_client = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }
}

/// Only a timed out connect gets the cold start treatment. A slow response
/// after the connection is up is a plain HTTP failure like everything else.
fn classify(err: reqwest::Error) -> FetchError {
    if err.is_connect() && err.is_timeout() {
        FetchError::Timeout(err.to_string())
    } else {
        FetchError::Http(err.to_string())
    }
}

#[async_trait]
impl HttpFetcher for UpstreamClient {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.http_client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        info!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or(""));
        if !status.is_success() {
            return Err(FetchError::Http(format!("{} for url: {}", status, url)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Http(format!("Invalid JSON body: {}", e)))
    }
}
