//! HDHomeRun device and cloud guide client

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

use super::traits::GuideSource;
use crate::config::DeviceConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::{DiscoverResponse, GuideChannel, LineupEntry};

const APP_NAME: &str = "HDHomeRun";
const APP_VERSION: &str = "20241007";
const PLATFORM: &str = "WINDOWS";
const PLATFORM_INFO: &str = r#"{"Vendor":"Web"}"#;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; WebView/3.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.102 Safari/537.36 Edge/18.22631";

/// Talks to the tuner over plain HTTP and to the vendor guide API over HTTPS
pub struct HdHomeRunClient {
    client: Client,
    discover_url: String,
    lineup_url: String,
    guide_url: String,
    synopsis_length: u32,
}

impl HdHomeRunClient {
    pub fn new(device: &DeviceConfig, synopsis_length: u32) -> SourceResult<Self> {
        Self::with_timeout(device, synopsis_length, device.request_timeout())
    }

    /// Client with a custom request timeout, used for the short lineup lookups of the web layer
    pub fn with_timeout(
        device: &DeviceConfig,
        synopsis_length: u32,
        timeout: Duration,
    ) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .build()
            .map_err(|e| SourceError::transport(&device.guide_api_url, e.to_string()))?;

        Ok(Self {
            client,
            discover_url: device.discover_url(),
            lineup_url: device.lineup_url(),
            guide_url: device.guide_api_url.clone(),
            synopsis_length,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SourceResult<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::transport(url, e.to_string()))?;
        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> SourceResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::http(url, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::transport(url, e.to_string()))?;
        trace!("{} returned {} bytes", url, body.len());

        serde_json::from_slice(&body).map_err(|e| SourceError::malformed(url, e.to_string()))
    }
}

#[async_trait]
impl GuideSource for HdHomeRunClient {
    async fn discover(&self) -> SourceResult<DiscoverResponse> {
        self.get_json(&self.discover_url).await
    }

    async fn lineup(&self) -> SourceResult<Vec<LineupEntry>> {
        self.get_json(&self.lineup_url).await
    }

    async fn guide(
        &self,
        device_auth: &str,
        start: Option<i64>,
    ) -> SourceResult<Option<Vec<GuideChannel>>> {
        let mut query = vec![
            ("DeviceAuth", device_auth.to_string()),
            ("SynopsisLength", self.synopsis_length.to_string()),
        ];
        if let Some(start) = start {
            query.push(("Start", start.to_string()));
        }

        let form = [
            ("AppName", APP_NAME),
            ("AppVersion", APP_VERSION),
            ("DeviceAuth", device_auth),
            ("Platform", PLATFORM),
            ("PlatformInfo", PLATFORM_INFO),
        ];

        debug!("POST {} (start: {:?})", self.guide_url, start);
        let response = self
            .client
            .post(&self.guide_url)
            .query(&query)
            .header(header::CACHE_CONTROL, "no-cache")
            .form(&form[..])
            .send()
            .await
            .map_err(|e| SourceError::transport(&self.guide_url, e.to_string()))?;

        Self::decode(&self.guide_url, response).await
    }
}
