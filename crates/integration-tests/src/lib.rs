//! Integration tests for CourseCart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coursecart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Shopper cart journeys driven through the session API
//! - `order_ledger` - Checkout, order history, and remote bookkeeping
//! - `remote_sync` - Best-effort mirroring and failure isolation
//! - `reconciliation` - Remote cart pull on sign-in
//!
//! The fixture wires a real [`StorefrontSession`] to in-memory fakes:
//! [`MemoryStore`] for local persistence, [`FakeRemote`] for the remote
//! store, [`AuthState`] for auth, and [`ToastSink`] for notifications.
//! No network and no UI; tests drive the session exactly the way an
//! embedding storefront would.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use coursecart_core::{Email, OrderNumber, Price, UserId};
use coursecart_session::{
    AuthState, ContactMessage, CurrentUser, LineItem, LocalStore, MemoryStore, Notifier, Order,
    Product, RemoteProfile, RemoteStore, RemoteStoreError, SessionConfig, SessionProvider,
    StorefrontSession, ToastLevel,
};

/// One recorded call against [`FakeRemote`].
#[derive(Debug, Clone)]
pub enum RemoteCall {
    FetchProfile { user: UserId },
    PutCart { user: UserId, items: Vec<LineItem> },
    PutToken { user: UserId, token: String },
    BumpCounters { user: UserId, total: Price },
    AppendOrder { user: UserId, number: OrderNumber },
    AppendMessage { user: UserId, body: String },
}

/// Remote store fake: records every call in arrival order, serves a
/// canned profile, and fails on demand. Calls are recorded even when
/// they then fail, so tests can assert that an attempt was made.
#[derive(Debug, Default)]
pub struct FakeRemote {
    calls: Mutex<Vec<RemoteCall>>,
    profile: Mutex<Option<RemoteProfile>>,
    fail_writes: AtomicBool,
    fail_fetches: AtomicBool,
}

impl FakeRemote {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fake whose `fetch_profile` serves this profile.
    #[must_use]
    pub fn with_profile(profile: RemoteProfile) -> Self {
        let remote = Self::new();
        remote.set_profile(profile);
        remote
    }

    /// Replace the profile served by `fetch_profile`.
    pub fn set_profile(&self, profile: RemoteProfile) {
        *self.profile.lock() = Some(profile);
    }

    /// Every call recorded so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    /// Make every write fail with an injected network error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::Relaxed);
    }

    /// Make `fetch_profile` fail.
    pub fn fail_fetches(&self) {
        self.fail_fetches.store(true, Ordering::Relaxed);
    }

    /// Let fetches succeed again.
    pub fn restore_fetches(&self) {
        self.fail_fetches.store(false, Ordering::Relaxed);
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().push(call);
    }

    fn write_result(&self) -> Result<(), RemoteStoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(RemoteStoreError::Unreachable("injected failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn fetch_profile(
        &self,
        user: &UserId,
    ) -> Result<Option<RemoteProfile>, RemoteStoreError> {
        self.record(RemoteCall::FetchProfile { user: user.clone() });
        if self.fail_fetches.load(Ordering::Relaxed) {
            return Err(RemoteStoreError::Unreachable("injected failure".into()));
        }
        Ok(self.profile.lock().clone())
    }

    async fn put_cart(&self, user: &UserId, items: &[LineItem]) -> Result<(), RemoteStoreError> {
        self.record(RemoteCall::PutCart {
            user: user.clone(),
            items: items.to_vec(),
        });
        self.write_result()
    }

    async fn put_push_token(&self, user: &UserId, token: &str) -> Result<(), RemoteStoreError> {
        self.record(RemoteCall::PutToken {
            user: user.clone(),
            token: token.to_string(),
        });
        self.write_result()
    }

    async fn bump_order_counters(
        &self,
        user: &UserId,
        order_total: Price,
    ) -> Result<(), RemoteStoreError> {
        self.record(RemoteCall::BumpCounters {
            user: user.clone(),
            total: order_total,
        });
        self.write_result()
    }

    async fn append_order(&self, user: &UserId, order: &Order) -> Result<(), RemoteStoreError> {
        self.record(RemoteCall::AppendOrder {
            user: user.clone(),
            number: order.number.clone(),
        });
        self.write_result()
    }

    async fn append_message(
        &self,
        user: &UserId,
        message: &ContactMessage,
    ) -> Result<(), RemoteStoreError> {
        self.record(RemoteCall::AppendMessage {
            user: user.clone(),
            body: message.body.clone(),
        });
        self.write_result()
    }
}

/// Notifier fake that collects toasts for assertion.
#[derive(Debug, Default)]
pub struct ToastSink {
    toasts: Mutex<Vec<(ToastLevel, String)>>,
}

impl ToastSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<(ToastLevel, String)> {
        self.toasts.lock().clone()
    }
}

impl Notifier for ToastSink {
    fn toast(&self, level: ToastLevel, message: &str) {
        self.toasts.lock().push((level, message.to_string()));
    }
}

/// A running session plus handles to every injected fake.
pub struct Harness {
    pub session: StorefrontSession,
    pub local: Arc<MemoryStore>,
    pub remote: Arc<FakeRemote>,
    pub auth: Arc<AuthState>,
    pub toasts: Arc<ToastSink>,
}

impl Harness {
    /// A fresh session over empty stores. Must be called from within a
    /// tokio runtime.
    #[must_use]
    pub fn start() -> Self {
        Self::with_remote(Arc::new(FakeRemote::new()))
    }

    /// A fresh session over an empty local store and the given remote.
    #[must_use]
    pub fn with_remote(remote: Arc<FakeRemote>) -> Self {
        Self::assemble(Arc::new(MemoryStore::new()), remote)
    }

    /// Wire a session to the given stores.
    #[must_use]
    pub fn assemble(local: Arc<MemoryStore>, remote: Arc<FakeRemote>) -> Self {
        init_tracing();
        let auth = Arc::new(AuthState::signed_out());
        let toasts = Arc::new(ToastSink::new());
        let session = StorefrontSession::start(
            SessionConfig::default(),
            Arc::clone(&local) as Arc<dyn LocalStore>,
            Arc::clone(&remote) as Arc<dyn RemoteStore>,
            Arc::clone(&auth) as Arc<dyn SessionProvider>,
            Arc::clone(&toasts) as Arc<dyn Notifier>,
        )
        .unwrap();
        Self {
            session,
            local,
            remote,
            auth,
            toasts,
        }
    }

    /// Tear this session down and start a new one over the same stores,
    /// the way a page reload would.
    #[must_use]
    pub fn restart(self) -> Self {
        Self::assemble(Arc::clone(&self.local), Arc::clone(&self.remote))
    }

    /// Sign in as `id` through the auth fake.
    pub fn sign_in(&self, id: &str) {
        self.auth.sign_in(user(id));
    }
}

/// A catalog product for tests.
#[must_use]
pub fn product(name: &str, cents: u32) -> Product {
    Product {
        name: name.to_string(),
        price: Price::from_cents(cents),
        image: format!("https://cdn.example/{}.jpg", name.to_lowercase().replace(' ', "-")),
    }
}

/// A signed-in user for tests.
#[must_use]
pub fn user(id: &str) -> CurrentUser {
    CurrentUser {
        id: UserId::new(id),
        email: Email::parse(&format!("{id}@example.com")).unwrap(),
    }
}

/// Install a tracing subscriber for the test binary. Only the first
/// call wins, so every harness can call it. Set `RUST_LOG` to see
/// session logs while debugging a test.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coursecart_session=debug".into());
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Spin until `condition` holds, panicking after a second so a hung
/// test fails fast instead of stalling the suite.
pub async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {what}"
        );
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

/// Spin until the remote has recorded at least `at_least` calls.
pub async fn wait_for_remote_calls(remote: &FakeRemote, at_least: usize) {
    wait_until("remote calls", || remote.calls().len() >= at_least).await;
}
