//! MCP tool implementations.
//!
//! Each tool returns its output as pretty JSON text. Upstream failures are
//! reported in the output's `error` field with a short user-facing message;
//! invalid parameters are protocol errors.

pub mod article_path;
pub mod article_search;
pub mod random_articles;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use wikilink_core::Error;

pub use article_path::{ArticlePathOutput, ArticlePathParams};
pub use article_search::{ArticleSearchOutput, ArticleSearchParams};
pub use random_articles::RandomArticlesOutput;

/// Serialize `output` as the single text content of a successful result.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Replace an upstream failure with `message`; anything else is a protocol error.
pub(crate) fn upstream_message(err: Error, message: &str) -> Result<String, McpError> {
    if err.is_upstream() {
        tracing::warn!(error = %err, "{}", message);
        Ok(message.to_string())
    } else {
        Err(err.into())
    }
}

/// Pull the JSON text back out of a tool result.
#[cfg(test)]
pub(crate) fn output_text(result: &CallToolResult) -> String {
    let content = serde_json::to_value(&result.content[0]).unwrap();
    content.get("text").and_then(|v| v.as_str()).expect("Expected text field in content").to_string()
}

#[cfg(test)]
pub(crate) mod harness {
    use std::sync::Arc;
    use std::time::Duration;

    use wikilink_core::testing::{FakeArticles, FakeBroker, FakePaths, MemoryConnector};
    use wikilink_core::{CacheStore, CredentialManager, WikiService};

    pub struct Harness {
        pub service: WikiService,
        pub articles: Arc<FakeArticles>,
        pub paths: Arc<FakePaths>,
        pub connector: Arc<MemoryConnector>,
    }

    pub fn harness() -> Harness {
        let broker = Arc::new(FakeBroker::with_lease_duration(3600));
        let connector = Arc::new(MemoryConnector::new());
        let manager = CredentialManager::new(broker, connector.clone(), "localhost:6379", "wikilink");
        let cache = CacheStore::new(Arc::new(manager), Duration::from_millis(200));
        let articles = Arc::new(FakeArticles::new());
        let paths = Arc::new(FakePaths::new());
        let service = WikiService::new(cache, articles.clone(), paths.clone());
        Harness { service, articles, paths, connector }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_becomes_message() {
        let message = upstream_message(Error::UpstreamTransport("status 502".into()), "could not complete search");
        assert_eq!(message.unwrap(), "could not complete search");
    }

    #[test]
    fn test_invalid_input_stays_an_error() {
        let result = upstream_message(Error::InvalidInput("query cannot be empty".into()), "could not complete search");
        let err = result.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
