//! Best-effort remote sync queue.
//!
//! Mutations never wait on the network. Instead they enqueue a job here
//! and return; a worker task drains the queue and runs each job as its
//! own detached task. The contract is deliberately weak:
//!
//! - at-most-once-attempted: a job that fails is logged and dropped,
//!   never retried
//! - no ordering: two jobs may complete in either order, so the remote
//!   cart converges to the last *arriving* write
//! - bounded: when the queue is full new jobs are dropped on the floor
//!   (the local store already has the data; the next mutation pushes a
//!   fresh snapshot)
//! - no cancellation: teardown does not await or abort in-flight jobs
//!
//! Jobs for signed-out sessions are skipped at dispatch time, since the
//! remote store is only reachable with an authenticated user.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, instrument, warn};

use crate::auth::{CurrentUser, SessionProvider};
use crate::cart::LineItem;
use crate::contact::ContactMessage;
use crate::orders::Order;
use crate::remote::RemoteStore;

/// One unit of remote work.
#[derive(Debug)]
pub(crate) enum SyncJob {
    /// Replace the remote cart mirror with this snapshot.
    PushCart(Vec<LineItem>),
    /// Append an order and bump the profile counters.
    RecordOrder(Box<Order>),
    /// Replace the remote push notification token.
    PushToken(String),
    /// Append a contact message.
    SendMessage(Box<ContactMessage>),
}

impl SyncJob {
    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::PushCart(_) => "push_cart",
            Self::RecordOrder(_) => "record_order",
            Self::PushToken(_) => "push_token",
            Self::SendMessage(_) => "send_message",
        }
    }
}

/// Handle to the sync worker. Dropping it (with the owning session)
/// closes the channel and lets the worker exit once drained; in-flight
/// jobs keep running detached.
#[derive(Debug)]
pub(crate) struct SyncQueue {
    tx: mpsc::Sender<SyncJob>,
}

impl SyncQueue {
    /// Spawn the worker task and return the enqueue handle.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn(
        remote: Arc<dyn RemoteStore>,
        auth: Arc<dyn SessionProvider>,
        capacity: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        tokio::spawn(run_worker(rx, remote, auth));
        Self { tx }
    }

    /// Queue a job without blocking. A full queue drops the job with a
    /// warning; the caller has already persisted locally and must not
    /// be failed over remote bookkeeping.
    pub(crate) fn enqueue(&self, job: SyncJob) {
        match self.tx.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                warn!(job = job.kind(), "Sync queue full, dropping job");
            }
            Err(TrySendError::Closed(job)) => {
                warn!(job = job.kind(), "Sync worker stopped, dropping job");
            }
        }
    }
}

/// Drain the queue, spawning each job as a detached task so a slow
/// remote call never holds up the jobs behind it.
async fn run_worker(
    mut rx: mpsc::Receiver<SyncJob>,
    remote: Arc<dyn RemoteStore>,
    auth: Arc<dyn SessionProvider>,
) {
    while let Some(job) = rx.recv().await {
        let Some(user) = auth.current_user() else {
            debug!(job = job.kind(), "No signed-in user, skipping sync job");
            continue;
        };
        tokio::spawn(dispatch(Arc::clone(&remote), user, job));
    }
    debug!("Sync queue closed, worker exiting");
}

/// Run one job against the remote store. Failures are logged and
/// swallowed: local state is the source of truth for the session.
#[instrument(skip_all, fields(job = job.kind(), user = %user.id))]
async fn dispatch(remote: Arc<dyn RemoteStore>, user: CurrentUser, job: SyncJob) {
    match job {
        SyncJob::PushCart(items) => {
            if let Err(e) = remote.put_cart(&user.id, &items).await {
                warn!(error = %e, "Cart sync failed, keeping local copy");
            }
        }
        SyncJob::RecordOrder(order) => {
            // Append and counter bump are independent best-effort
            // writes; one failing does not stop the other.
            if let Err(e) = remote.append_order(&user.id, &order).await {
                warn!(error = %e, order = %order.number, "Remote order append failed");
            }
            if let Err(e) = remote.bump_order_counters(&user.id, order.total).await {
                warn!(error = %e, order = %order.number, "Order counter update failed");
            }
        }
        SyncJob::PushToken(token) => {
            if let Err(e) = remote.put_push_token(&user.id, &token).await {
                warn!(error = %e, "Push token sync failed");
            }
        }
        SyncJob::SendMessage(message) => {
            if let Err(e) = remote.append_message(&user.id, &message).await {
                warn!(error = %e, "Contact message delivery failed");
            }
        }
    }
}
