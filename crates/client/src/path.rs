//! Path-finding service client.
//!
//! `GET http://<address>/search?start=<src>&end=<dst>` returns
//! `{error?, ids[], titles[]}`. A non-empty `error` is an upstream failure;
//! empty `ids`/`titles` means there is no path.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;
use wikilink_core::{Error, PathProvider, PathResult};

use crate::http::{build_client, get_json};

/// Path client configuration.
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// `host:port` (or full base URL) of the path service.
    pub address: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            address: "localhost:8080".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "wikilink/0.1".to_string(),
        }
    }
}

/// Raw path service response.
#[derive(Debug, Deserialize)]
struct PathApiResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    ids: Vec<u32>,
    #[serde(default)]
    titles: Vec<String>,
}

impl PathApiResponse {
    fn into_result(self) -> Result<PathResult, Error> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Err(Error::UpstreamTransport(format!("path service error: {error}")));
        }
        Ok(PathResult { ids: self.ids, titles: self.titles })
    }
}

/// Client for the path-finding service.
#[derive(Debug, Clone)]
pub struct PathClient {
    http: Client,
    endpoint: Url,
}

impl PathClient {
    pub fn new(config: PathConfig) -> Result<Self, Error> {
        let endpoint = search_endpoint(&config.address)?;
        let http = build_client(&config.user_agent, config.timeout)
            .map_err(|e| Error::UpstreamTransport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// `http://<address>/search`, keeping an explicit scheme if one is given.
fn search_endpoint(address: &str) -> Result<Url, Error> {
    let trimmed = address.trim().trim_end_matches('/');
    let base = if trimmed.contains("://") { trimmed.to_string() } else { format!("http://{trimmed}") };
    Url::parse(&format!("{base}/search"))
        .map_err(|e| Error::InvalidInput(format!("invalid path service address {address}: {e}")))
}

#[async_trait]
impl PathProvider for PathClient {
    async fn find_path(&self, src: &str, dst: &str) -> Result<PathResult, Error> {
        tracing::debug!("finding path: start={} end={}", src, dst);

        let request = self
            .http
            .get(self.endpoint.clone())
            .query(&[("start", src), ("end", dst)]);
        let raw: PathApiResponse = get_json(request, "path service").await?;
        raw.into_result()
    }
}
