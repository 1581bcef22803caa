//! wikilink server entry point.
//!
//! Boots the MCP server on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;
use wikilink_client::{PathClient, PathConfig, VaultAuth, VaultBroker, VaultConfig, WikiClient, WikiConfig};
use wikilink_core::cache::RedisConnector;
use wikilink_core::{AppConfig, CacheStore, CredentialManager, VaultAuthMethod, WikiService};

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    tracing::info!(
        wiki = %config.wiki_api_url,
        path_api = %config.path_api_address,
        redis = %config.redis_address,
        vault = %config.vault_address,
        "Starting wikilink server on stdio transport"
    );

    let service = build_service(&config)?;
    let handler = handler::WikilinkServer::new(service, config.random_count);
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    Ok(())
}

fn build_service(config: &AppConfig) -> Result<WikiService> {
    let auth = match config.vault_auth_method {
        VaultAuthMethod::AppRole => {
            let (role_id, secret_id) = config.require_approle_ids()?;
            VaultAuth::AppRole { role_id: role_id.to_string(), secret_id: SecretString::from(secret_id.to_string()) }
        }
        VaultAuthMethod::Kubernetes => VaultAuth::Kubernetes { jwt_path: config.vault_jwt_path.clone() },
    };

    let broker = VaultBroker::new(VaultConfig {
        address: config.vault_address.clone(),
        auth_mount: config.vault_auth_mount().to_string(),
        auth,
        timeout: config.broker_timeout(),
        user_agent: config.user_agent.clone(),
    })?;

    let credentials = CredentialManager::new(
        Arc::new(broker),
        Arc::new(RedisConnector),
        config.redis_address.clone(),
        config.vault_role.clone(),
    );
    let cache = CacheStore::new(Arc::new(credentials), config.cache_timeout());

    let articles = WikiClient::new(WikiConfig {
        api_url: config.wiki_api_url.clone(),
        search_limit: config.search_limit,
        timeout: config.upstream_timeout(),
        user_agent: config.user_agent.clone(),
    })?;

    let paths = PathClient::new(PathConfig {
        address: config.path_api_address.clone(),
        timeout: config.upstream_timeout(),
        user_agent: config.user_agent.clone(),
    })?;

    Ok(WikiService::new(cache, Arc::new(articles), Arc::new(paths)))
}
