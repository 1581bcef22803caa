//! Core types and shared functionality for wikilink.
//!
//! This crate provides:
//! - Cache-aside search and path lookups over a Redis cache
//! - Lazily renewed dynamic cache credentials
//! - Parallel random-article fetches
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod service;
pub mod upstream;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use cache::{CacheKey, CacheStore};
pub use config::{AppConfig, ConfigError, VaultAuthMethod};
pub use credentials::{BrokerSecret, BrokerToken, CredentialLease, CredentialManager, SecretsBroker};
pub use error::Error;
pub use service::WikiService;
pub use upstream::{ArticleProvider, PathProvider, PathResult, RandomArticle};
