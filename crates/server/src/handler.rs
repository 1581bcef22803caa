//! MCP server handler implementation.
//!
//! Routes tool calls to the implementations in [`crate::tools`] and logs one
//! request line per call with its elapsed time.

use std::time::Instant;

use crate::tools::{
    ArticlePathParams, ArticleSearchParams, article_path::path_impl, article_search::search_impl,
    random_articles::random_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult, PaginatedRequestParam,
        ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use wikilink_core::WikiService;

/// The main MCP server handler for wikilink.
#[derive(Clone)]
pub struct WikilinkServer {
    service: WikiService,
    random_count: usize,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl WikilinkServer {
    pub fn new(service: WikiService, random_count: usize) -> Self {
        Self { service, random_count, tool_router: Self::tool_router() }
    }

    /// Search article titles.
    #[tool(description = "Search article titles. Returns up to the configured number of titles, best match first.")]
    async fn article_search(&self, params: Parameters<ArticleSearchParams>) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let result = search_impl(&self.service, params.0).await;
        log_call("article_search", start, &result);
        result
    }

    /// Shortest link path between two articles.
    #[tool(description = "Find the shortest chain of links from the src article to the dst article.")]
    async fn article_path(&self, params: Parameters<ArticlePathParams>) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let result = path_impl(&self.service, params.0).await;
        log_call("article_path", start, &result);
        result
    }

    #[tool(description = "Fetch a batch of random articles with a one-sentence summary each.")]
    async fn random_articles(&self) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let result = random_impl(&self.service, self.random_count).await;
        log_call("random_articles", start, &result);
        result
    }

    #[tool(description = "Liveness check. Returns ok.")]
    async fn health(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

fn log_call(tool: &str, start: Instant, result: &Result<CallToolResult, McpError>) {
    let took_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(_) => tracing::info!(tool, took_ms, "tool call"),
        Err(e) => tracing::info!(tool, took_ms, error = %e.message, "tool call rejected"),
    }
}

impl ServerHandler for WikilinkServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "wikilink".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::harness::harness;

    #[test]
    fn test_lists_all_tools() {
        let server = WikilinkServer::new(harness().service, 10);
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["article_path", "article_search", "health", "random_articles"]);
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let server = WikilinkServer::new(harness().service, 10);
        let result = server.health().await.unwrap();
        assert_eq!(crate::tools::output_text(&result), "ok");
    }

    #[tokio::test]
    async fn test_random_uses_configured_count() {
        let h = harness();
        let server = WikilinkServer::new(h.service, 4);
        server.random_articles().await.unwrap();
        assert_eq!(h.articles.random_calls(), 4);
    }
}
