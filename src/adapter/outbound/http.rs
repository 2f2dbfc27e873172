//! Shared HTTP client construction with proxy detection.
//!
//! Proxies come from the conventional environment variables for the target
//! URL's scheme: `http_proxy`/`HTTP_PROXY` for `http`, `https_proxy`/
//! `HTTPS_PROXY` for `https`. Lowercase wins; empty values are skipped.

use std::time::Duration;

use reqwest::{Client, Proxy};
use tracing::debug;
use url::Url;

use crate::error::Result;

const USER_AGENT: &str = concat!("cosi-broker/", env!("CARGO_PKG_VERSION"));

/// Timeout for a whole request, connection included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Proxy URL for `scheme`, looked up through `env`.
///
/// A proxy given without a scheme is assumed to be plain `http://`.
pub fn proxy_for_scheme<F>(scheme: &str, env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let keys: &[&str] = match scheme {
        "http" => &["http_proxy", "HTTP_PROXY"],
        "https" => &["https_proxy", "HTTPS_PROXY"],
        _ => return None,
    };

    let proxy = keys
        .iter()
        .filter_map(|key| env(*key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())?;

    if proxy.starts_with("http://") || proxy.starts_with("https://") {
        Some(proxy)
    } else {
        Some(format!("http://{proxy}"))
    }
}

/// Proxy URL configured in the process environment for `target`.
#[must_use]
pub fn proxy_from_env(target: &Url) -> Option<String> {
    proxy_for_scheme(target.scheme(), |key| std::env::var(key).ok())
}

/// Build a client that talks to `target`, through `proxy` if given.
pub fn build_client(target: &Url, proxy: Option<&str>) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .no_proxy();

    if let Some(proxy) = proxy {
        debug!(target = %target, proxy, "Using proxy");
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}

/// Parse a base URL, making sure relative joins extend its path.
pub fn base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{raw}/"))?)
    }
}
