//! MediaWiki search and random-article client.
//!
//! ### Endpoints
//!
//! Both calls go to the configured `api.php`:
//!
//! - **Search**: `action=query&list=search`, main namespace, `srlimit` results,
//!   titles returned in ranking order.
//! - **Random**: `action=query&generator=random`, one page with a one-sentence
//!   plain-text extract.

pub mod response;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use wikilink_core::{ArticleProvider, Error, RandomArticle};

use crate::http::{build_client, get_json};
use response::{RandomApiResponse, SearchApiResponse};

/// Default `api.php` endpoint.
const DEFAULT_API_URL: &str = "https://he.wikipedia.org/w/api.php";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "wikilink/0.1";

/// Wiki client configuration.
#[derive(Debug, Clone)]
pub struct WikiConfig {
    /// `api.php` endpoint (default: Hebrew Wikipedia).
    pub api_url: String,
    /// Maximum titles per search (default: 5).
    pub search_limit: u8,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: wikilink/0.x).
    pub user_agent: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            search_limit: 5,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// MediaWiki API client.
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: Client,
    config: WikiConfig,
}

impl WikiClient {
    pub fn new(config: WikiConfig) -> Result<Self, Error> {
        let http = build_client(&config.user_agent, config.timeout)
            .map_err(|e| Error::UpstreamTransport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    fn search_params(&self, query: &str) -> Vec<(&'static str, String)> {
        vec![
            ("action", "query".into()),
            ("list", "search".into()),
            ("srnamespace", "0".into()),
            ("srlimit", self.config.search_limit.to_string()),
            ("prop", "info".into()),
            ("utf8", String::new()),
            ("format", "json".into()),
            ("origin", "*".into()),
            ("srsearch", query.into()),
        ]
    }

    fn random_params() -> [(&'static str, &'static str); 11] {
        [
            ("action", "query"),
            ("generator", "random"),
            ("grnnamespace", "0"),
            ("grnlimit", "1"),
            ("prop", "info|extracts"),
            ("exlimit", "1"),
            ("explaintext", "true"),
            ("exsentences", "1"),
            ("utf8", ""),
            ("format", "json"),
            ("origin", "*"),
        ]
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }
}

#[async_trait]
impl ArticleProvider for WikiClient {
    async fn search(&self, query: &str) -> Result<Vec<String>, Error> {
        tracing::debug!("searching wiki: query={}", query);

        let request = self.http.get(&self.config.api_url).query(&self.search_params(query));
        let raw: SearchApiResponse = get_json(request, "wiki search").await?;
        raw.into_titles()
    }

    async fn random(&self) -> Result<RandomArticle, Error> {
        let request = self.http.get(&self.config.api_url).query(&Self::random_params());
        let raw: RandomApiResponse = get_json(request, "wiki random").await?;
        raw.into_article()
    }
}
