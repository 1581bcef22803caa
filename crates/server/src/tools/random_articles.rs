//! random_articles tool implementation.
//!
//! Fetches a batch of random articles concurrently. Never cached.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wikilink_core::{RandomArticle, WikiService};

use super::json_result;

/// Output structure for random_articles tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RandomArticlesOutput {
    /// One entry per request; failed fetches carry id -1.
    pub results: Vec<RandomArticle>,
}

/// Implementation of the random_articles tool.
pub async fn random_impl(service: &WikiService, count: usize) -> Result<CallToolResult, McpError> {
    let results = service.fetch_random(count).await;
    let failed = results.iter().filter(|a| a.is_placeholder()).count();
    if failed > 0 {
        tracing::debug!("{} of {} random fetches failed", failed, count);
    }

    json_result(&RandomArticlesOutput { results })
}
