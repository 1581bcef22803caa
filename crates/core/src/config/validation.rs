//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - any timeout is below 100ms or above 5 minutes
    /// - `search_limit` or `random_count` is outside 1..=50
    /// - an address, the Vault role, or `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("upstream_timeout_ms", self.upstream_timeout_ms),
            ("cache_timeout_ms", self.cache_timeout_ms),
            ("broker_timeout_ms", self.broker_timeout_ms),
        ] {
            if value < MIN_TIMEOUT_MS {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
            }
            if value > MAX_TIMEOUT_MS {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if !(1..=50).contains(&self.search_limit) {
            return Err(ConfigError::Invalid { field: "search_limit".into(), reason: "must be between 1 and 50".into() });
        }
        if !(1..=50).contains(&self.random_count) {
            return Err(ConfigError::Invalid { field: "random_count".into(), reason: "must be between 1 and 50".into() });
        }

        for (field, value) in [
            ("wiki_api_url", &self.wiki_api_url),
            ("path_api_address", &self.path_api_address),
            ("redis_address", &self.redis_address),
            ("vault_address", &self.vault_address),
            ("vault_role", &self.vault_role),
            ("user_agent", &self.user_agent),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must not be empty".into() });
            }
        }

        if self.vault_secret_id.is_some() && self.vault_role_id.is_none() {
            tracing::warn!("vault_secret_id is set without vault_role_id; AppRole login will fail");
        }

        Ok(())
    }
}
