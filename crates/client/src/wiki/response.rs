//! MediaWiki API response types.
//!
//! Only the fields the service reads are modelled; everything else in the
//! API response is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use wikilink_core::{Error, RandomArticle};

/// Error object MediaWiki returns with a 200 status.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::UpstreamTransport(format!("wiki api error {}: {}", err.code, err.info))
    }
}

/// Raw `list=search` response.
#[derive(Debug, Deserialize)]
pub struct SearchApiResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default)]
    pub query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub pageid: i64,
}

impl SearchApiResponse {
    /// Titles in ranking order.
    pub fn into_titles(self) -> Result<Vec<String>, Error> {
        if let Some(err) = self.error {
            return Err(err.into());
        }
        let query = self
            .query
            .ok_or_else(|| Error::UpstreamDecode("wiki search response has no query".into()))?;
        Ok(query.search.into_iter().map(|hit| hit.title).collect())
    }
}

/// Raw `generator=random` response.
#[derive(Debug, Deserialize)]
pub struct RandomApiResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default)]
    pub query: Option<RandomQuery>,
}

/// Pages keyed by page id.
#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    #[serde(default)]
    pub pages: BTreeMap<String, RandomPage>,
}

#[derive(Debug, Deserialize)]
pub struct RandomPage {
    pub pageid: i64,
    pub title: String,
    #[serde(default)]
    pub extract: String,
}

impl RandomApiResponse {
    /// The first page in the response (the request asks for exactly one).
    pub fn into_article(self) -> Result<RandomArticle, Error> {
        if let Some(err) = self.error {
            return Err(err.into());
        }
        let page = self
            .query
            .and_then(|query| query.pages.into_values().next())
            .ok_or_else(|| Error::UpstreamDecode("wiki random response has no pages".into()))?;

        Ok(RandomArticle { title: page.title, snippet: page.extract, id: page.pageid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"{
        "batchcomplete": "",
        "continue": {"sroffset": 5, "continue": "-||"},
        "query": {
            "searchinfo": {"totalhits": 1234},
            "search": [
                {"ns": 0, "title": "חיפה", "pageid": 1195, "size": 120000, "wordcount": 9000,
                 "snippet": "<span class=\"searchmatch\">חיפה</span> היא עיר", "timestamp": "2024-05-01T10:00:00Z"},
                {"ns": 0, "title": "מפרץ חיפה", "pageid": 88231, "snippet": ""}
            ]
        }
    }"#;

    const RANDOM_FIXTURE: &str = r#"{
        "batchcomplete": "",
        "continue": {"grncontinue": "0.52|0.52|1|0", "continue": "grncontinue||"},
        "query": {
            "pages": {
                "443211": {
                    "pageid": 443211, "ns": 0, "title": "נחל עמוד",
                    "contentmodel": "wikitext", "pagelanguage": "he", "touched": "2024-05-01T10:00:00Z",
                    "lastrevid": 1, "length": 4000, "extract": "נחל עמוד הוא נחל בגליל."
                }
            }
        }
    }"#;

    #[test]
    fn test_search_titles_in_order() {
        let raw: SearchApiResponse = serde_json::from_str(SEARCH_FIXTURE).unwrap();
        assert_eq!(raw.into_titles().unwrap(), vec!["חיפה".to_string(), "מפרץ חיפה".to_string()]);
    }

    #[test]
    fn test_search_zero_hits_is_empty() {
        let raw: SearchApiResponse =
            serde_json::from_str(r#"{"query": {"searchinfo": {"totalhits": 0}, "search": []}}"#).unwrap();
        assert!(raw.into_titles().unwrap().is_empty());
    }

    #[test]
    fn test_search_api_error() {
        let raw: SearchApiResponse =
            serde_json::from_str(r#"{"error": {"code": "nosrsearch", "info": "The \"srsearch\" parameter must be set."}}"#)
                .unwrap();
        assert!(matches!(raw.into_titles(), Err(Error::UpstreamTransport(msg)) if msg.contains("nosrsearch")));
    }

    #[test]
    fn test_search_missing_query_is_decode_error() {
        let raw: SearchApiResponse = serde_json::from_str(r#"{"batchcomplete": ""}"#).unwrap();
        assert!(matches!(raw.into_titles(), Err(Error::UpstreamDecode(_))));
    }

    #[test]
    fn test_random_article() {
        let raw: RandomApiResponse = serde_json::from_str(RANDOM_FIXTURE).unwrap();
        let article = raw.into_article().unwrap();
        assert_eq!(article.id, 443211);
        assert_eq!(article.title, "נחל עמוד");
        assert_eq!(article.snippet, "נחל עמוד הוא נחל בגליל.");
    }

    #[test]
    fn test_random_without_pages() {
        let raw: RandomApiResponse = serde_json::from_str(r#"{"query": {"pages": {}}}"#).unwrap();
        assert!(matches!(raw.into_article(), Err(Error::UpstreamDecode(_))));
    }
}
