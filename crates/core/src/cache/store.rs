//! Credential-aware cache operations.

use std::sync::Arc;
use std::time::Duration;

use super::key::CacheKey;
use crate::Error;
use crate::credentials::CredentialManager;

/// Cache facade that renews credentials before every operation.
///
/// Each call takes a fresh handle from the [`CredentialManager`] and bounds
/// the backend round-trip with `timeout`.
#[derive(Clone)]
pub struct CacheStore {
    credentials: Arc<CredentialManager>,
    timeout: Duration,
}

impl CacheStore {
    pub fn new(credentials: Arc<CredentialManager>, timeout: Duration) -> Self {
        Self { credentials, timeout }
    }

    /// Read the payload cached under `key`.
    ///
    /// A missing entry is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Renewal errors propagate unchanged; backend failures and timeouts are
    /// `Error::CacheTransport`.
    pub async fn get(&self, key: &CacheKey) -> Result<Option<String>, Error> {
        let handle = self.credentials.valid_handle().await?;
        tokio::time::timeout(self.timeout, handle.get(key.as_str()))
            .await
            .map_err(|_| Error::CacheTransport(format!("GET {key} timed out after {:?}", self.timeout)))?
    }

    /// Store `value` under `key`.
    ///
    /// Callers treat failures as non-fatal.
    pub async fn put(&self, key: &CacheKey, value: &str) -> Result<(), Error> {
        let handle = self.credentials.valid_handle().await?;
        tokio::time::timeout(self.timeout, handle.set(key.as_str(), value))
            .await
            .map_err(|_| Error::CacheTransport(format!("SET {key} timed out after {:?}", self.timeout)))?
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }
}
