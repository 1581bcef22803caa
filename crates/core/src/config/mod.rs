//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WIKILINK_*)
//! 2. TOML config file (if WIKILINK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// How the service authenticates to the secrets broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultAuthMethod {
    /// AppRole login with a role id and secret id.
    AppRole,
    /// Kubernetes service-account login with the pod's projected JWT.
    Kubernetes,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WIKILINK_*)
/// 2. TOML config file (if WIKILINK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// MediaWiki `api.php` endpoint used for search and random articles.
    ///
    /// Set via WIKILINK_WIKI_API_URL environment variable.
    #[serde(default = "default_wiki_api_url")]
    pub wiki_api_url: String,

    /// Maximum number of titles returned by a search.
    #[serde(default = "default_search_limit")]
    pub search_limit: u8,

    /// Number of random articles fetched per request.
    #[serde(default = "default_random_count")]
    pub random_count: usize,

    /// `host:port` of the path-finding service.
    ///
    /// Set via WIKILINK_PATH_API_ADDRESS environment variable.
    #[serde(default = "default_path_api_address")]
    pub path_api_address: String,

    /// `host:port` of the Redis cache.
    #[serde(default = "default_redis_address")]
    pub redis_address: String,

    /// Base address of the Vault server.
    #[serde(default = "default_vault_address")]
    pub vault_address: String,

    /// Vault role used both for login and for `database/creds/<role>`.
    #[serde(default = "default_vault_role")]
    pub vault_role: String,

    /// Login method for Vault.
    #[serde(default = "default_vault_auth_method")]
    pub vault_auth_method: VaultAuthMethod,

    /// Mount path of the auth method (defaults to the method's own name).
    #[serde(default)]
    pub vault_auth_mount: Option<String>,

    /// AppRole role id.
    ///
    /// Set via WIKILINK_VAULT_ROLE_ID environment variable.
    #[serde(default)]
    pub vault_role_id: Option<String>,

    /// AppRole secret id.
    ///
    /// Set via WIKILINK_VAULT_SECRET_ID environment variable.
    #[serde(default)]
    pub vault_secret_id: Option<String>,

    /// Service-account token file for Kubernetes login.
    #[serde(default = "default_vault_jwt_path")]
    pub vault_jwt_path: String,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for search, random and path requests in milliseconds.
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,

    /// Timeout for each cache GET/SET in milliseconds.
    #[serde(default = "default_cache_timeout_ms")]
    pub cache_timeout_ms: u64,

    /// Timeout for each secrets broker call in milliseconds.
    #[serde(default = "default_broker_timeout_ms")]
    pub broker_timeout_ms: u64,
}

fn default_wiki_api_url() -> String {
    "https://he.wikipedia.org/w/api.php".into()
}

fn default_search_limit() -> u8 {
    5
}

fn default_random_count() -> usize {
    10
}

fn default_path_api_address() -> String {
    "localhost:8080".into()
}

fn default_redis_address() -> String {
    "localhost:6379".into()
}

fn default_vault_address() -> String {
    "http://localhost:8200".into()
}

fn default_vault_role() -> String {
    "wikilink".into()
}

fn default_vault_auth_method() -> VaultAuthMethod {
    VaultAuthMethod::AppRole
}

fn default_vault_jwt_path() -> String {
    "/var/run/secrets/kubernetes.io/serviceaccount/token".into()
}

fn default_user_agent() -> String {
    "wikilink/0.1".into()
}

fn default_upstream_timeout_ms() -> u64 {
    10_000
}

fn default_cache_timeout_ms() -> u64 {
    2_000
}

fn default_broker_timeout_ms() -> u64 {
    5_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wiki_api_url: default_wiki_api_url(),
            search_limit: default_search_limit(),
            random_count: default_random_count(),
            path_api_address: default_path_api_address(),
            redis_address: default_redis_address(),
            vault_address: default_vault_address(),
            vault_role: default_vault_role(),
            vault_auth_method: default_vault_auth_method(),
            vault_auth_mount: None,
            vault_role_id: None,
            vault_secret_id: None,
            vault_jwt_path: default_vault_jwt_path(),
            user_agent: default_user_agent(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            cache_timeout_ms: default_cache_timeout_ms(),
            broker_timeout_ms: default_broker_timeout_ms(),
        }
    }
}

impl AppConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    pub fn broker_timeout(&self) -> Duration {
        Duration::from_millis(self.broker_timeout_ms)
    }

    /// Mount path for the configured auth method.
    pub fn vault_auth_mount(&self) -> &str {
        match (&self.vault_auth_mount, self.vault_auth_method) {
            (Some(mount), _) => mount,
            (None, VaultAuthMethod::AppRole) => "approle",
            (None, VaultAuthMethod::Kubernetes) => "kubernetes",
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WIKILINK_`
    /// 2. TOML file from `WIKILINK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WIKILINK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WIKILINK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// AppRole credentials, checked when the broker client is built.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if either id is not set.
    pub fn require_approle_ids(&self) -> Result<(&str, &str), ConfigError> {
        let role_id = self.vault_role_id.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "vault_role_id".into(),
            hint: "Set WIKILINK_VAULT_ROLE_ID environment variable".into(),
        })?;
        let secret_id = self.vault_secret_id.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "vault_secret_id".into(),
            hint: "Set WIKILINK_VAULT_SECRET_ID environment variable".into(),
        })?;
        Ok((role_id, secret_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.wiki_api_url, "https://he.wikipedia.org/w/api.php");
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.random_count, 10);
        assert_eq!(config.redis_address, "localhost:6379");
        assert_eq!(config.vault_role, "wikilink");
        assert_eq!(config.vault_auth_method, VaultAuthMethod::AppRole);
        assert_eq!(config.user_agent, "wikilink/0.1");
        assert!(config.vault_role_id.is_none());
    }

    #[test]
    fn test_timeout_durations() {
        let config = AppConfig::default();
        assert_eq!(config.upstream_timeout(), Duration::from_millis(10_000));
        assert_eq!(config.cache_timeout(), Duration::from_millis(2_000));
        assert_eq!(config.broker_timeout(), Duration::from_millis(5_000));
    }

    #[test]
    fn test_auth_mount_defaults_to_method() {
        let config = AppConfig::default();
        assert_eq!(config.vault_auth_mount(), "approle");

        let config = AppConfig { vault_auth_method: VaultAuthMethod::Kubernetes, ..Default::default() };
        assert_eq!(config.vault_auth_mount(), "kubernetes");

        let config = AppConfig { vault_auth_mount: Some("k8s-prod".into()), ..Default::default() };
        assert_eq!(config.vault_auth_mount(), "k8s-prod");
    }

    #[test]
    fn test_require_approle_ids_missing() {
        let config = AppConfig { vault_role_id: Some("role".into()), ..Default::default() };
        let result = config.require_approle_ids();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "vault_secret_id"));
    }

    #[test]
    fn test_require_approle_ids_present() {
        let config = AppConfig {
            vault_role_id: Some("role".into()),
            vault_secret_id: Some("secret".into()),
            ..Default::default()
        };
        assert_eq!(config.require_approle_ids().unwrap(), ("role", "secret"));
    }

    #[test]
    fn test_auth_method_deserializes_lowercase() {
        let method: VaultAuthMethod = serde_json::from_str(r#""kubernetes""#).unwrap();
        assert_eq!(method, VaultAuthMethod::Kubernetes);
    }
}
