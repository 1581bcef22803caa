//! Cache key canonicalization.
//!
//! Queries that differ only in letter case, percent-encoding or whitespace
//! map to the same key, so a hit does not depend on how the caller happened
//! to spell the query. The upstream is asked with the same normalized term
//! the key is built from, so one key always stands for one upstream request.

use std::borrow::Cow;
use std::fmt;

/// A canonical cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a full-text search.
    pub fn search(query: &str) -> Self {
        Self::for_search_term(&normalize_term(query))
    }

    /// Key for a path lookup between two articles.
    pub fn path(src: &str, dst: &str) -> Self {
        Self::for_path_terms(&normalize_term(src), &normalize_term(dst))
    }

    /// Key for a term already passed through [`normalize_term`].
    pub fn for_search_term(term: &str) -> Self {
        Self(format!("search:{}", urlencoding::encode(term)))
    }

    /// Key for terms already passed through [`normalize_term`].
    pub fn for_path_terms(src: &str, dst: &str) -> Self {
        Self(format!("path:start={}&end={}", urlencoding::encode(src), urlencoding::encode(dst)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The plain-text form of a query term sent upstream.
///
/// Percent-decodes (input that is not valid UTF-8 after decoding is used
/// as-is), trims, collapses whitespace runs to a single space and lowercases.
/// Empty when the input is blank.
pub fn normalize_term(input: &str) -> String {
    let decoded = urlencoding::decode(input).unwrap_or(Cow::Borrowed(input));
    decoded.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Percent-encoded [`normalize_term`], as it appears inside a key.
///
/// The result is a fixed point: `canonical_term(canonical_term(q)) == canonical_term(q)`.
pub fn canonical_term(input: &str) -> String {
    urlencoding::encode(&normalize_term(input)).into_owned()
}
