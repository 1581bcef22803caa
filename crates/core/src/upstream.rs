//! Upstream provider contracts and result types.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Shortest path between two articles.
///
/// Both sequences are empty when no path exists; that is a valid answer, not
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PathResult {
    /// Page ids along the path, source first.
    #[serde(default)]
    pub ids: Vec<u32>,
    /// Titles along the path, source first.
    #[serde(default)]
    pub titles: Vec<String>,
}

impl PathResult {
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// One randomly chosen article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RandomArticle {
    pub title: String,
    pub snippet: String,
    /// Page id, or [`RandomArticle::ERROR_ID`] for a failed fetch.
    pub id: i64,
}

impl RandomArticle {
    pub const ERROR_ID: i64 = -1;

    /// Stand-in for a fetch that failed.
    pub fn placeholder(reason: impl Into<String>) -> Self {
        Self { title: "Error fetching random article".into(), snippet: reason.into(), id: Self::ERROR_ID }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == Self::ERROR_ID
    }
}

/// Full-text search and random-article provider.
#[async_trait]
pub trait ArticleProvider: Send + Sync {
    /// Titles matching `query`, best match first.
    async fn search(&self, query: &str) -> Result<Vec<String>, Error>;

    async fn random(&self) -> Result<RandomArticle, Error>;
}

/// Path-finding provider.
#[async_trait]
pub trait PathProvider: Send + Sync {
    async fn find_path(&self, src: &str, dst: &str) -> Result<PathResult, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_result_deserializes_without_fields() {
        let result: PathResult = serde_json::from_str("{}").unwrap();
        assert!(result.is_empty());
        assert!(result.ids.is_empty());
    }

    #[test]
    fn test_placeholder() {
        let article = RandomArticle::placeholder("status 503");
        assert!(article.is_placeholder());
        assert_eq!(article.id, -1);
        assert_eq!(article.snippet, "status 503");
    }
}
