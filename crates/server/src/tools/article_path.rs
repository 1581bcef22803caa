//! article_path tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wikilink_core::WikiService;

use super::{json_result, upstream_message};

/// Input parameters for article_path tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ArticlePathParams {
    /// Title of the starting article.
    pub src: String,
    /// Title of the target article.
    pub dst: String,
}

/// Output structure for article_path tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ArticlePathOutput {
    /// Page ids along the path, source first.
    pub ids: Vec<u32>,
    /// Titles along the path, source first.
    pub titles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Implementation of the article_path tool.
pub async fn path_impl(service: &WikiService, params: ArticlePathParams) -> Result<CallToolResult, McpError> {
    let output = match service.path_with_cache(&params.src, &params.dst).await {
        Ok(path) if path.is_empty() => {
            ArticlePathOutput { ids: path.ids, titles: path.titles, error: Some("Path not found!".into()) }
        }
        Ok(path) => ArticlePathOutput { ids: path.ids, titles: path.titles, error: None },
        Err(e) => ArticlePathOutput { error: Some(upstream_message(e, "could not complete path")?), ..Default::default() },
    };

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::harness::harness;
    use crate::tools::output_text;
    use wikilink_core::PathResult;

    fn params(src: &str, dst: &str) -> ArticlePathParams {
        ArticlePathParams { src: src.into(), dst: dst.into() }
    }

    fn decode(result: &CallToolResult) -> ArticlePathOutput {
        serde_json::from_str(&output_text(result)).unwrap()
    }

    #[tokio::test]
    async fn test_path_found() {
        let h = harness();
        h.paths.set_path(PathResult { ids: vec![1, 2, 3], titles: vec!["A".into(), "B".into(), "C".into()] });

        let output = decode(&path_impl(&h.service, params("A", "C")).await.unwrap());
        assert_eq!(output.ids, vec![1, 2, 3]);
        assert_eq!(output.titles, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
        assert!(output.error.is_none());
    }

    #[tokio::test]
    async fn test_path_not_found_message() {
        let h = harness();
        h.paths.set_path(PathResult::default());

        let output = decode(&path_impl(&h.service, params("Island", "Continent")).await.unwrap());
        assert!(output.titles.is_empty());
        assert_eq!(output.error.as_deref(), Some("Path not found!"));
    }

    #[tokio::test]
    async fn test_upstream_failure_message() {
        let h = harness();
        h.paths.fail_upstream(true);

        let output = decode(&path_impl(&h.service, params("A", "C")).await.unwrap());
        assert_eq!(output.error.as_deref(), Some("could not complete path"));
    }

    #[tokio::test]
    async fn test_blank_endpoint_is_invalid() {
        let h = harness();
        assert!(path_impl(&h.service, params("", "C")).await.is_err());
        assert!(path_impl(&h.service, params("A", " ")).await.is_err());
        assert_eq!(h.paths.calls(), 0);
    }
}
