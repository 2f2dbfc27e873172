//! Circonus REST API client.
//!
//! Authenticates with an API token and application name and hands back the
//! status, raw body and leniently parsed JSON of every response.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::adapter::outbound::http;
use crate::error::Result;
use crate::port::outbound::{ApiResponse, BrokerApi};

const AUTH_TOKEN_HEADER: &str = "X-Circonus-Auth-Token";
const APP_NAME_HEADER: &str = "X-Circonus-App-Name";

/// HTTP client for the Circonus API.
pub struct CirconusApi {
    client: Client,
    base_url: Url,
    api_key: String,
    app_name: String,
}

impl CirconusApi {
    /// Create a client for `base_url` (e.g. `https://api.circonus.com/v2/`),
    /// honoring proxy settings from the environment.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Result<Self> {
        let base_url = http::base_url(base_url)?;
        let proxy = http::proxy_from_env(&base_url);
        Self::with_proxy(base_url, proxy.as_deref(), api_key, app_name)
    }

    /// Create a client with an explicit proxy (or none).
    pub fn with_proxy(
        base_url: Url,
        proxy: Option<&str>,
        api_key: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: http::build_client(&base_url, proxy)?,
            base_url,
            api_key: api_key.into(),
            app_name: app_name.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl BrokerApi for CirconusApi {
    async fn get(&self, path: &str, params: Option<&[(&str, &str)]>) -> Result<ApiResponse> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "GET");

        let mut request = self
            .client
            .get(url)
            .header(AUTH_TOKEN_HEADER, &self.api_key)
            .header(APP_NAME_HEADER, &self.app_name)
            .header(ACCEPT, "application/json");

        if let Some(params) = params {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let raw_body = response.text().await?;
        let body = serde_json::from_str::<Value>(&raw_body)
            .ok()
            .filter(|v| !v.is_null());

        debug!(path, status, bytes = raw_body.len(), "API response");

        Ok(ApiResponse {
            body,
            status,
            raw_body,
        })
    }
}
