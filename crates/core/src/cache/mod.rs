//! Redis-backed cache with rotating credentials.
//!
//! This module provides the cache half of the cache-aside pattern:
//!
//! - Canonical cache keys for search and path queries
//! - A backend seam (`CacheBackend` / `BackendConnector`) with a Redis implementation
//! - `CacheStore`, which renews credentials before every operation
//!
//! Entries carry no TTL. The backend may drop any entry at any time and
//! callers treat that as a miss.

pub mod backend;
pub mod key;
pub mod redis_cache;
pub mod store;

pub use backend::{BackendConnector, CacheBackend, CacheHandle};
pub use key::{CacheKey, canonical_term, normalize_term};
pub use redis_cache::{RedisBackend, RedisConnector};
pub use store::CacheStore;
