//! Dynamic cache credentials.
//!
//! The cache backend does not use static passwords. A [`CredentialManager`]
//! logs in to a secrets broker with a fixed role, reads a short-lived
//! username/password pair for that role and builds a fresh backend handle
//! from it. Renewal is lazy: it happens on the first cache operation that
//! finds the current lease absent or expired.

pub mod lease;
pub mod manager;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::Error;

pub use lease::CredentialLease;
pub use manager::CredentialManager;

/// Session token returned by a broker login.
pub struct BrokerToken(SecretString);

impl BrokerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn secret(&self) -> &SecretString {
        &self.0
    }
}

impl std::fmt::Debug for BrokerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BrokerToken([REDACTED])")
    }
}

/// A dynamic secret as returned by the broker, before validation.
#[derive(Debug, Clone, Default)]
pub struct BrokerSecret {
    /// Raw secret payload; expected to carry string `username` and `password`.
    pub data: Map<String, Value>,
    /// Seconds the broker will honour these credentials for.
    pub lease_duration: u64,
}

/// A secrets broker able to mint database credentials for a role.
#[async_trait]
pub trait SecretsBroker: Send + Sync {
    /// Authenticate as `role`.
    ///
    /// Returns `Error::Auth` when the broker rejects the login.
    async fn login(&self, role: &str) -> Result<BrokerToken, Error>;

    /// Read `database/creds/<role>` with a session token.
    async fn read_credentials(&self, token: &BrokerToken, role: &str) -> Result<BrokerSecret, Error>;
}
