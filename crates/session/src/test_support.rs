//! Shared fakes for unit tests: a call-recording remote store, a
//! toast-collecting notifier, and small helpers around them.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use coursecart_core::{Email, OrderNumber, Price, UserId};

use crate::auth::{AuthState, CurrentUser};
use crate::cart::LineItem;
use crate::contact::ContactMessage;
use crate::notify::{Notifier, ToastLevel};
use crate::orders::Order;
use crate::remote::{RemoteProfile, RemoteStore, RemoteStoreError};

/// One recorded remote-store invocation.
#[derive(Debug, Clone)]
pub(crate) enum RemoteCall {
    FetchProfile { user: UserId },
    PutCart { user: UserId, items: Vec<LineItem> },
    PutToken { user: UserId, token: String },
    BumpCounters { user: UserId, total: Price },
    AppendOrder { user: UserId, number: OrderNumber },
    AppendMessage { user: UserId, body: String },
}

/// Remote store fake that records every call. Failure switches make it
/// misbehave on demand; calls are recorded even when they then fail, so
/// tests can assert an attempt was made.
#[derive(Debug, Default)]
pub(crate) struct RecordingRemote {
    calls: Mutex<Vec<RemoteCall>>,
    profile: Mutex<Option<RemoteProfile>>,
    fail_writes: AtomicBool,
    fail_fetches: AtomicBool,
    fail_order_appends: AtomicBool,
    put_cart_gate: Mutex<Option<Arc<Notify>>>,
}

impl RecordingRemote {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve this profile from `fetch_profile`.
    pub(crate) fn with_profile(profile: RemoteProfile) -> Self {
        let remote = Self::new();
        *remote.profile.lock() = Some(profile);
        remote
    }

    /// Every call recorded so far, in arrival order.
    pub(crate) fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    /// Make every write fail with an injected network error.
    pub(crate) fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::Relaxed);
    }

    /// Make `fetch_profile` fail.
    pub(crate) fn fail_fetches(&self) {
        self.fail_fetches.store(true, Ordering::Relaxed);
    }

    /// Make only `append_order` fail.
    pub(crate) fn fail_order_appends(&self) {
        self.fail_order_appends.store(true, Ordering::Relaxed);
    }

    /// Park the next `put_cart` call until the returned handle is
    /// notified. The call is recorded only after it unparks.
    pub(crate) fn gate_next_put_cart(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.put_cart_gate.lock() = Some(Arc::clone(&gate));
        gate
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
impl RemoteStore for RecordingRemote {
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
        let gate = self.put_cart_gate.lock().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
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
        if self.fail_order_appends.load(Ordering::Relaxed) {
            return Err(RemoteStoreError::Unreachable("injected failure".into()));
        }
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
pub(crate) struct ToastSink {
    toasts: Mutex<Vec<(ToastLevel, String)>>,
}

impl ToastSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn toasts(&self) -> Vec<(ToastLevel, String)> {
        self.toasts.lock().clone()
    }
}

impl Notifier for ToastSink {
    fn toast(&self, level: ToastLevel, message: &str) {
        self.toasts.lock().push((level, message.to_string()));
    }
}

/// Auth state already signed in as `id`, with a derived email.
pub(crate) fn signed_in_auth(id: &str) -> Arc<AuthState> {
    let auth = AuthState::signed_out();
    auth.sign_in(test_user(id));
    Arc::new(auth)
}

/// A user for tests.
pub(crate) fn test_user(id: &str) -> CurrentUser {
    CurrentUser {
        id: UserId::new(id),
        email: Email::parse(&format!("{id}@example.com")).unwrap(),
    }
}

/// Spin until the remote has recorded at least `at_least` calls,
/// panicking after a second so a hung test fails fast.
pub(crate) async fn wait_for_calls(remote: &RecordingRemote, at_least: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while remote.calls().len() < at_least {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {at_least} remote calls"
        );
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
