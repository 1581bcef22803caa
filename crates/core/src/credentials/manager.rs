//! Lease renewal and handle rotation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use super::{CredentialLease, SecretsBroker};
use crate::Error;
use crate::cache::{BackendConnector, CacheHandle};

/// A lease together with the handle built from it.
///
/// Published as one `Arc` so readers never see a handle paired with the
/// wrong lease.
struct Session {
    lease: CredentialLease,
    handle: CacheHandle,
}

/// Owns the cache backend's credentials and the handle built from them.
///
/// Any number of tasks may read the current handle concurrently. Renewal is
/// serialized: tasks that observe an expired lease queue on `renewal`, and
/// all but the first find a fresh session when they get the lock.
pub struct CredentialManager {
    broker: Arc<dyn SecretsBroker>,
    connector: Arc<dyn BackendConnector>,
    address: String,
    role: String,
    current: RwLock<Option<Arc<Session>>>,
    renewal: Mutex<()>,
    renewals: AtomicU64,
}

impl CredentialManager {
    pub fn new(
        broker: Arc<dyn SecretsBroker>, connector: Arc<dyn BackendConnector>, address: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            broker,
            connector,
            address: address.into(),
            role: role.into(),
            current: RwLock::new(None),
            renewal: Mutex::new(()),
            renewals: AtomicU64::new(0),
        }
    }

    /// Return a handle backed by an unexpired lease, renewing first if needed.
    ///
    /// Callers should take the handle once per operation and drop it
    /// afterwards; a later renewal does not update handles already handed out.
    ///
    /// # Errors
    ///
    /// Returns the renewal error (`Error::Auth`, `Error::Credential`, or
    /// `Error::CacheTransport` from the connector). The manager stays in the
    /// "needs renewal" state so the next call retries.
    pub async fn valid_handle(&self) -> Result<CacheHandle, Error> {
        if let Some(handle) = self.current_handle().await {
            return Ok(handle);
        }

        let _guard = self.renewal.lock().await;

        if let Some(handle) = self.current_handle().await {
            return Ok(handle);
        }

        let session = match self.renew().await {
            Ok(session) => Arc::new(session),
            Err(e) => {
                tracing::warn!(role = %self.role, error = %e, "cache credential renewal failed");
                return Err(e);
            }
        };

        let handle = session.handle.clone();
        *self.current.write().await = Some(session);
        Ok(handle)
    }

    /// Number of successful renewals since construction.
    pub fn renewals(&self) -> u64 {
        self.renewals.load(Ordering::Relaxed)
    }

    async fn current_handle(&self) -> Option<CacheHandle> {
        let current = self.current.read().await;
        current
            .as_ref()
            .filter(|session| session.lease.is_valid())
            .map(|session| session.handle.clone())
    }

    async fn renew(&self) -> Result<Session, Error> {
        let token = self.broker.login(&self.role).await?;
        let secret = self.broker.read_credentials(&token, &self.role).await?;
        let lease = CredentialLease::from_secret(secret, Utc::now())?;
        let handle = self.connector.connect(&self.address, &lease)?;

        self.renewals.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(role = %self.role, expires_at = %lease.expires_at(), "renewed cache credentials");

        Ok(Session { lease, handle })
    }
}
