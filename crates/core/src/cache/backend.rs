//! Key/value cache backend seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Error;
use crate::credentials::CredentialLease;

/// A connected key/value cache.
///
/// A missing key is `Ok(None)`. Transport failures are `Error::CacheTransport`.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key` with no expiry.
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// Shared, immutable handle to a backend built for one lease.
pub type CacheHandle = Arc<dyn CacheBackend>;

/// Builds a backend handle from an address and a credential lease.
pub trait BackendConnector: Send + Sync {
    fn connect(&self, address: &str, lease: &CredentialLease) -> Result<CacheHandle, Error>;
}
