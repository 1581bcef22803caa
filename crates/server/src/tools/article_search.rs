//! article_search tool implementation.
//!
//! Title search through the cache-aside service.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wikilink_core::WikiService;

use super::{json_result, upstream_message};

/// Input parameters for article_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ArticleSearchParams {
    /// Free-text query (required).
    pub query: String,
}

/// Output structure for article_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ArticleSearchOutput {
    /// Matching titles, best match first.
    pub results: Vec<String>,
    /// User-facing message when there is nothing to show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Implementation of the article_search tool.
pub async fn search_impl(service: &WikiService, params: ArticleSearchParams) -> Result<CallToolResult, McpError> {
    let output = match service.search_with_cache(&params.query).await {
        Ok(results) if results.is_empty() => {
            ArticleSearchOutput { results, error: Some(format!("No matches found for: {}", params.query.trim())) }
        }
        Ok(results) => ArticleSearchOutput { results, error: None },
        Err(e) => ArticleSearchOutput {
            results: Vec::new(),
            error: Some(upstream_message(e, "could not complete search")?),
        },
    };

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::harness::harness;
    use crate::tools::output_text;

    fn decode(result: &CallToolResult) -> ArticleSearchOutput {
        serde_json::from_str(&output_text(result)).unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_titles() {
        let h = harness();
        h.articles.set_titles(vec!["חיפה".into(), "מפרץ חיפה".into()]);

        let result = search_impl(&h.service, ArticleSearchParams { query: "חיפה".into() }).await.unwrap();
        let output = decode(&result);
        assert_eq!(output.results, vec!["חיפה".to_string(), "מפרץ חיפה".to_string()]);
        assert!(output.error.is_none());
        assert!(!h.connector.is_empty());
    }

    #[tokio::test]
    async fn test_no_matches_message() {
        let h = harness();
        h.articles.set_titles(vec![]);

        let result = search_impl(&h.service, ArticleSearchParams { query: "qwxz".into() }).await.unwrap();
        let output = decode(&result);
        assert!(output.results.is_empty());
        assert_eq!(output.error.as_deref(), Some("No matches found for: qwxz"));
    }

    #[tokio::test]
    async fn test_upstream_failure_message() {
        let h = harness();
        h.articles.fail_upstream(true);

        let result = search_impl(&h.service, ArticleSearchParams { query: "haifa".into() }).await.unwrap();
        assert_eq!(decode(&result).error.as_deref(), Some("could not complete search"));
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid() {
        let h = harness();
        let result = search_impl(&h.service, ArticleSearchParams::default()).await;
        assert!(result.is_err());
        assert_eq!(h.articles.search_calls(), 0);
    }
}
