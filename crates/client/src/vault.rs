//! Vault secrets broker.
//!
//! ### Protocol
//!
//! - **Login**: `POST /v1/auth/<mount>/login`; the session token is `auth.client_token`.
//!   AppRole sends `{role_id, secret_id}`; Kubernetes sends `{role, jwt}` with the
//!   pod's service-account token read at login time.
//! - **Credentials**: `GET /v1/database/creds/<role>` with `X-Vault-Token`;
//!   returns `{data: {username, password}, lease_duration}`.
//!
//! Any failure to log in or read the credential path is `Error::Auth`. A
//! response without a `data` object is `Error::Credential`; field-level
//! checks happen when the lease is built.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use wikilink_core::{BrokerSecret, BrokerToken, Error, SecretsBroker};

use crate::http::build_client;

/// How to authenticate to Vault.
pub enum VaultAuth {
    AppRole { role_id: String, secret_id: SecretString },
    Kubernetes { jwt_path: String },
}

impl std::fmt::Debug for VaultAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultAuth::AppRole { role_id, .. } => f.debug_struct("AppRole").field("role_id", role_id).finish_non_exhaustive(),
            VaultAuth::Kubernetes { jwt_path } => f.debug_struct("Kubernetes").field("jwt_path", jwt_path).finish(),
        }
    }
}

/// Vault client configuration.
#[derive(Debug)]
pub struct VaultConfig {
    /// Base address, e.g. `http://vault:8200` (scheme defaults to http).
    pub address: String,
    /// Mount path of the auth method.
    pub auth_mount: String,
    pub auth: VaultAuth,
    pub timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    auth: Option<LoginAuth>,
}

#[derive(Debug, Deserialize)]
struct LoginAuth {
    client_token: String,
}

#[derive(Debug, Deserialize)]
struct SecretResponse {
    #[serde(default)]
    lease_duration: u64,
    data: Option<Map<String, Value>>,
}

/// Vault-backed [`SecretsBroker`].
#[derive(Debug)]
pub struct VaultBroker {
    http: Client,
    base_url: String,
    auth_mount: String,
    auth: VaultAuth,
}

impl VaultBroker {
    pub fn new(config: VaultConfig) -> Result<Self, Error> {
        let http = build_client(&config.user_agent, config.timeout)
            .map_err(|e| Error::Auth(format!("failed to build HTTP client: {e}")))?;

        let address = config.address.trim().trim_end_matches('/');
        let base_url = if address.contains("://") { address.to_string() } else { format!("http://{address}") };

        Ok(Self { http, base_url, auth_mount: config.auth_mount.trim_matches('/').to_string(), auth: config.auth })
    }

    fn login_url(&self) -> String {
        format!("{}/v1/auth/{}/login", self.base_url, self.auth_mount)
    }

    fn creds_url(&self, role: &str) -> String {
        format!("{}/v1/database/creds/{}", self.base_url, role)
    }

    async fn login_body(&self, role: &str) -> Result<Value, Error> {
        match &self.auth {
            VaultAuth::AppRole { role_id, secret_id } => {
                Ok(json!({ "role_id": role_id, "secret_id": secret_id.expose_secret() }))
            }
            VaultAuth::Kubernetes { jwt_path } => {
                let jwt = tokio::fs::read_to_string(jwt_path)
                    .await
                    .map_err(|e| Error::Auth(format!("cannot read service account token {jwt_path}: {e}")))?;
                Ok(json!({ "role": role, "jwt": jwt.trim() }))
            }
        }
    }
}

#[async_trait]
impl SecretsBroker for VaultBroker {
    async fn login(&self, role: &str) -> Result<BrokerToken, Error> {
        let body = self.login_body(role).await?;

        let response = self
            .http
            .post(self.login_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("vault unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Auth(rejection("login", status)));
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("unreadable login response: {e}")))?;

        let auth = login.auth.ok_or_else(|| Error::Auth("vault login returned no auth block".into()))?;
        tracing::debug!(mount = %self.auth_mount, "logged in to vault");

        Ok(BrokerToken::new(auth.client_token))
    }

    async fn read_credentials(&self, token: &BrokerToken, role: &str) -> Result<BrokerSecret, Error> {
        let response = self
            .http
            .get(self.creds_url(role))
            .header("X-Vault-Token", token.secret().expose_secret())
            .send()
            .await
            .map_err(|e| Error::Auth(format!("vault unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Auth(rejection("credential read", status)));
        }

        let secret: SecretResponse = response
            .json()
            .await
            .map_err(|e| Error::Credential(format!("malformed secret for role {role}: {e}")))?;

        let data = secret
            .data
            .ok_or_else(|| Error::Credential(format!("secret for role {role} has no data")))?;

        Ok(BrokerSecret { data, lease_duration: secret.lease_duration })
    }
}

fn rejection(step: &str, status: StatusCode) -> String {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("vault rejected {step} (status {})", status.as_u16())
        }
        _ => format!("vault {step} failed (status {})", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broker(address: &str, auth: VaultAuth) -> VaultBroker {
        VaultBroker::new(VaultConfig {
            address: address.into(),
            auth_mount: "approle".into(),
            auth,
            timeout: Duration::from_secs(2),
            user_agent: "wikilink/0.1".into(),
        })
        .unwrap()
    }

    fn approle() -> VaultAuth {
        VaultAuth::AppRole { role_id: "role-id".into(), secret_id: SecretString::from("secret-id".to_string()) }
    }

    #[test]
    fn test_urls() {
        let broker = broker("vault.internal:8200/", approle());
        assert_eq!(broker.login_url(), "http://vault.internal:8200/v1/auth/approle/login");
        assert_eq!(broker.creds_url("wikilink"), "http://vault.internal:8200/v1/database/creds/wikilink");
    }

    #[test]
    fn test_urls_keep_scheme() {
        let broker = broker("https://vault.example.com", approle());
        assert_eq!(broker.login_url(), "https://vault.example.com/v1/auth/approle/login");
    }

    #[test]
    fn test_debug_hides_secret_id() {
        let rendered = format!("{:?}", approle());
        assert!(rendered.contains("role-id"));
        assert!(!rendered.contains("secret-id"));
    }

    #[tokio::test]
    async fn test_approle_login_body() {
        let broker = broker("localhost:8200", approle());
        let body = broker.login_body("wikilink").await.unwrap();
        assert_eq!(body, json!({"role_id": "role-id", "secret_id": "secret-id"}));
    }

    #[tokio::test]
    async fn test_kubernetes_missing_token_is_auth_error() {
        let broker = broker("localhost:8200", VaultAuth::Kubernetes { jwt_path: "/nonexistent/token".into() });
        let result = broker.login_body("wikilink").await;
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[test]
    fn test_secret_response_shape() {
        let raw: SecretResponse = serde_json::from_str(
            r#"{"request_id": "x", "lease_id": "database/creds/wikilink/abc", "renewable": true,
                "lease_duration": 3600, "data": {"username": "v-approle-wikilink-abc", "password": "A1a-xyz"}}"#,
        )
        .unwrap();
        assert_eq!(raw.lease_duration, 3600);
        assert_eq!(raw.data.unwrap()["username"], "v-approle-wikilink-abc");
    }

    #[test]
    fn test_rejection_messages() {
        assert!(rejection("login", StatusCode::FORBIDDEN).contains("rejected"));
        assert!(rejection("login", StatusCode::BAD_GATEWAY).contains("failed"));
    }

    #[tokio::test]
    async fn test_unreachable_vault_is_auth_error() {
        let broker = broker("127.0.0.1:1", approle());
        let result = broker.login("wikilink").await;
        assert!(matches!(result, Err(Error::Auth(_))));
    }
}
