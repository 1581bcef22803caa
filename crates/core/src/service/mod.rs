//! Cache-aside lookups over the upstream providers.
//!
//! Search and path lookups read through the cache:
//!
//! 1. Normalize the query; the normalized term is both the [`CacheKey`]
//!    source and what the upstream is asked
//! 2. Return the cached payload if it exists and still deserializes
//! 3. Otherwise call the upstream once (no retries here)
//! 4. Backfill the cache, ignoring write failures
//!
//! Cache and credential failures never fail a lookup; they only cost the
//! upstream round-trip. Random articles bypass the cache entirely.

pub mod fanout;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Error;
use crate::cache::{CacheKey, CacheStore, normalize_term};
use crate::upstream::{ArticleProvider, PathProvider, PathResult, RandomArticle};

/// Read-through service consumed by the query surface.
#[derive(Clone)]
pub struct WikiService {
    cache: CacheStore,
    articles: Arc<dyn ArticleProvider>,
    paths: Arc<dyn PathProvider>,
}

impl WikiService {
    pub fn new(cache: CacheStore, articles: Arc<dyn ArticleProvider>, paths: Arc<dyn PathProvider>) -> Self {
        Self { cache, articles, paths }
    }

    /// Titles matching `query`, from cache when possible.
    ///
    /// An empty list is a valid, cacheable answer.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` for a blank query; upstream errors otherwise.
    pub async fn search_with_cache(&self, query: &str) -> Result<Vec<String>, Error> {
        let term = normalize_term(query);
        if term.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".into()));
        }

        let key = CacheKey::for_search_term(&term);
        if let Some(titles) = self.cached::<Vec<String>>(&key).await {
            return Ok(titles);
        }

        let titles = self.articles.search(&term).await?;
        tracing::debug!(%key, results = titles.len(), "search fetched from upstream");

        self.backfill(&key, &titles).await;
        Ok(titles)
    }

    /// Path from `src` to `dst`, from cache when possible.
    ///
    /// "No path" is an empty [`PathResult`] and is cached like any other answer.
    pub async fn path_with_cache(&self, src: &str, dst: &str) -> Result<PathResult, Error> {
        let (src, dst) = (normalize_term(src), normalize_term(dst));
        if src.is_empty() || dst.is_empty() {
            return Err(Error::InvalidInput("src and dst are required".into()));
        }

        let key = CacheKey::for_path_terms(&src, &dst);
        if let Some(path) = self.cached::<PathResult>(&key).await {
            return Ok(path);
        }

        let path = self.paths.find_path(&src, &dst).await?;
        tracing::debug!(%key, hops = path.titles.len(), "path fetched from upstream");

        self.backfill(&key, &path).await;
        Ok(path)
    }

    /// `n` random articles fetched in parallel; never cached.
    pub async fn fetch_random(&self, n: usize) -> Vec<RandomArticle> {
        fanout::fetch_random(self.articles.clone(), n).await
    }

    async fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(value) => {
                    tracing::debug!(%key, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    // Usually an entry written by an older payload format.
                    tracing::warn!(%key, error = %e, "cached payload did not deserialize; treating as miss");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(%key, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "cache read failed; falling back to upstream");
                None
            }
        }
    }

    async fn backfill<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(%key, error = %e, "failed to serialize result for cache");
                return;
            }
        };

        if let Err(e) = self.cache.put(key, &payload).await {
            tracing::warn!(%key, error = %e, "failed to cache result");
        }
    }
}
