//! In-process fakes for the broker, cache backend and upstream providers.
//!
//! Available to this crate's tests and, with the `test-util` feature, to
//! downstream crates' tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::Error;
use crate::cache::{BackendConnector, CacheBackend, CacheHandle};
use crate::credentials::{BrokerSecret, BrokerToken, CredentialLease, SecretsBroker};
use crate::upstream::{ArticleProvider, PathProvider, PathResult, RandomArticle};

/// Broker that issues `v-<role>-<n>` users with a fixed lease duration.
pub struct FakeBroker {
    lease_duration: u64,
    logins: AtomicUsize,
    reject_logins: AtomicBool,
    omit_password: AtomicBool,
    login_delay: Mutex<Duration>,
}

impl FakeBroker {
    pub fn with_lease_duration(lease_duration: u64) -> Self {
        Self {
            lease_duration,
            logins: AtomicUsize::new(0),
            reject_logins: AtomicBool::new(false),
            omit_password: AtomicBool::new(false),
            login_delay: Mutex::new(Duration::ZERO),
        }
    }

    /// Successful logins so far.
    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn reject_logins(&self, reject: bool) {
        self.reject_logins.store(reject, Ordering::SeqCst);
    }

    pub fn omit_password(&self, omit: bool) {
        self.omit_password.store(omit, Ordering::SeqCst);
    }

    pub fn set_login_delay(&self, delay: Duration) {
        *self.login_delay.lock().unwrap_or_else(|e| e.into_inner()) = delay;
    }
}

#[async_trait]
impl SecretsBroker for FakeBroker {
    async fn login(&self, role: &str) -> Result<BrokerToken, Error> {
        let delay = *self.login_delay.lock().unwrap_or_else(|e| e.into_inner());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.reject_logins.load(Ordering::SeqCst) {
            return Err(Error::Auth(format!("permission denied for role {role}")));
        }

        let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(BrokerToken::new(format!("token-{n}")))
    }

    async fn read_credentials(&self, _token: &BrokerToken, role: &str) -> Result<BrokerSecret, Error> {
        let mut data = Map::new();
        data.insert("username".into(), Value::String(format!("v-{role}-{}", self.logins())));
        if !self.omit_password.load(Ordering::SeqCst) {
            data.insert("password".into(), Value::String("generated-password".into()));
        }
        Ok(BrokerSecret { data, lease_duration: self.lease_duration })
    }
}

type SharedMap = Arc<Mutex<HashMap<String, String>>>;

/// Connector whose handles all share one in-memory map.
///
/// Entries survive credential rotation, like a real cache server.
pub struct MemoryConnector {
    store: SharedMap,
    unreachable: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
    connects: AtomicUsize,
    last_username: Mutex<Option<String>>,
    last_address: Mutex<Option<String>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self {
            store: Arc::default(),
            unreachable: Arc::new(AtomicBool::new(false)),
            latency_ms: Arc::new(AtomicU64::new(0)),
            connects: AtomicUsize::new(0),
            last_username: Mutex::new(None),
            last_address: Mutex::new(None),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn last_username(&self) -> Option<String> {
        self.last_username.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_address(&self) -> Option<String> {
        self.last_address.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make every handle fail with `Error::CacheTransport`.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Delay every backend call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms.store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Write an entry directly, bypassing any handle.
    pub fn insert(&self, key: &str, value: &str) {
        self.store
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }
}

impl Default for MemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendConnector for MemoryConnector {
    fn connect(&self, address: &str, lease: &CredentialLease) -> Result<CacheHandle, Error> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        *self.last_username.lock().unwrap_or_else(|e| e.into_inner()) = Some(lease.username().to_string());
        *self.last_address.lock().unwrap_or_else(|e| e.into_inner()) = Some(address.to_string());

        Ok(Arc::new(MemoryBackend {
            store: self.store.clone(),
            unreachable: self.unreachable.clone(),
            latency_ms: self.latency_ms.clone(),
        }))
    }
}

struct MemoryBackend {
    store: SharedMap,
    unreachable: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
}

impl MemoryBackend {
    async fn round_trip(&self) -> Result<(), Error> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(Error::CacheTransport("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.round_trip().await?;
        Ok(self.store.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.round_trip().await?;
        self.store
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Article provider returning canned titles and numbered random articles.
#[derive(Default)]
pub struct FakeArticles {
    titles: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    echo: AtomicBool,
    fail: AtomicBool,
    search_calls: AtomicUsize,
    random_calls: AtomicUsize,
}

impl FakeArticles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_titles(&self, titles: Vec<String>) {
        *self.titles.lock().unwrap_or_else(|e| e.into_inner()) = titles;
    }

    /// Answer each search with `results-for:<query>` instead of the canned titles.
    pub fn echo_queries(&self, echo: bool) {
        self.echo.store(echo, Ordering::SeqCst);
    }

    /// Make every call fail with `Error::UpstreamTransport`.
    pub fn fail_upstream(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Queries received by `search`, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn random_calls(&self) -> usize {
        self.random_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleProvider for FakeArticles {
    async fn search(&self, query: &str) -> Result<Vec<String>, Error> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap_or_else(|e| e.into_inner()).push(query.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::UpstreamTransport("status 503".into()));
        }
        if self.echo.load(Ordering::SeqCst) {
            return Ok(vec![format!("results-for:{query}")]);
        }
        Ok(self.titles.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn random(&self) -> Result<RandomArticle, Error> {
        let n = self.random_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::UpstreamTransport("status 503".into()));
        }
        Ok(RandomArticle { title: format!("Random {n}"), snippet: format!("Snippet {n}"), id: n as i64 })
    }
}

/// Path provider returning one canned path.
#[derive(Default)]
pub struct FakePaths {
    path: Mutex<PathResult>,
    requests: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl FakePaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_path(&self, path: PathResult) {
        *self.path.lock().unwrap_or_else(|e| e.into_inner()) = path;
    }

    pub fn fail_upstream(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(src, dst)` pairs received by `find_path`, in call order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PathProvider for FakePaths {
    async fn find_path(&self, src: &str, dst: &str) -> Result<PathResult, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((src.to_string(), dst.to_string()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::UpstreamDecode("expected value at line 1 column 1".into()));
        }
        Ok(self.path.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }
}
