//! Client for the COSI `brokers` endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, error};
use url::Url;

use crate::adapter::outbound::http;
use crate::domain::DefaultBrokerMap;
use crate::error::{ApiError, Result};
use crate::port::outbound::DefaultsSource;

const BROKERS_PATH: &str = "brokers";

/// Fetches the platform default broker mapping from COSI.
pub struct CosiDefaults {
    client: Client,
    url: Url,
}

impl CosiDefaults {
    /// Create a client for the service rooted at `cosi_url`, honoring proxy
    /// settings from the environment.
    pub fn new(cosi_url: &str) -> Result<Self> {
        let url = http::base_url(cosi_url)?.join(BROKERS_PATH)?;
        let proxy = http::proxy_from_env(&url);
        Self::with_proxy(url, proxy.as_deref())
    }

    /// Create a client for the full endpoint `url` with an explicit proxy
    /// (or none).
    pub fn with_proxy(url: Url, proxy: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: http::build_client(&url, proxy)?,
            url,
        })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl DefaultsSource for CosiDefaults {
    async fn fetch(&self) -> Result<DefaultBrokerMap> {
        let url = self.url.to_string();

        let response = match self.client.get(self.url.clone()).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                error!(url = %url, error = %e, "Unable to connect to COSI");
                return Err(ApiError::Unreachable { url }.into());
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        let raw_body = response.text().await?;

        if status != StatusCode::OK {
            error!(url = %url, status = status.as_u16(), body = %raw_body, "COSI API error");
            return Err(ApiError::Status {
                path: url,
                status: status.as_u16(),
                raw_body,
            }
            .into());
        }

        let object: Map<String, Value> =
            serde_json::from_str(&raw_body).map_err(|e| ApiError::Decode {
                path: url.clone(),
                reason: e.to_string(),
            })?;

        debug!(url = %url, keys = object.len(), "Fetched COSI default brokers");
        Ok(DefaultBrokerMap::from_object(&object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DefaultEntry;
    use crate::error::Error;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        Url::parse(&format!("http://{addr}/{BROKERS_PATH}")).unwrap()
    }

    #[tokio::test]
    async fn fetch_parses_mapping() {
        let url = serve_once("200 OK", r#"{"json": "5", "httptrap": ["7", "8"], "httptrap_default": 1}"#).await;
        let source = CosiDefaults::with_proxy(url, None).unwrap();

        let map = source.fetch().await.unwrap();
        assert_eq!(map.get("json"), Some(&DefaultEntry::Single("5".into())));
        assert_eq!(
            map.get("httptrap"),
            Some(&DefaultEntry::List {
                ids: vec!["7".into(), "8".into()],
                index: 1
            })
        );
    }

    #[tokio::test]
    async fn fetch_rejects_non_200() {
        let url = serve_once("503 Service Unavailable", "down").await;
        let source = CosiDefaults::with_proxy(url, None).unwrap();

        match source.fetch().await {
            Err(Error::Api(ApiError::Status { status: 503, raw_body, .. })) => {
                assert_eq!(raw_body, "down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_rejects_malformed_json() {
        let url = serve_once("200 OK", "{not json").await;
        let source = CosiDefaults::with_proxy(url, None).unwrap();

        assert!(matches!(
            source.fetch().await,
            Err(Error::Api(ApiError::Decode { .. }))
        ));
    }

    #[tokio::test]
    async fn fetch_reports_refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/{BROKERS_PATH}")).unwrap();
        let source = CosiDefaults::with_proxy(url, None).unwrap();

        assert!(matches!(
            source.fetch().await,
            Err(Error::Api(ApiError::Unreachable { .. }))
        ));
    }
}
