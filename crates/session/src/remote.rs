//! Remote profile store collaborator.
//!
//! A document-per-user store reachable only for authenticated sessions.
//! From this crate's perspective every write is asynchronous and
//! best-effort: the sync queue logs failures and moves on, and nothing
//! here feeds back into cart mutation results.
//!
//! The trait's operations mirror what the backing store offers natively
//! (partial field updates, counter increments, collection appends), so
//! an implementation stays a thin client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use coursecart_core::{Price, UserId};

use crate::cart::LineItem;
use crate::contact::ContactMessage;
use crate::orders::Order;

/// Errors reported by a [`RemoteStore`] implementation.
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    /// The store could not be reached.
    #[error("Remote store unreachable: {0}")]
    Unreachable(String),

    /// The session is not allowed to touch this document.
    #[error("Remote permission denied: {0}")]
    PermissionDenied(String),

    /// The stored document did not decode.
    #[error("Malformed remote document: {0}")]
    Malformed(String),
}

/// The per-user profile document, as much of it as this session reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProfile {
    /// Cart mirror; `None` when the user has never synced a cart
    pub cart: Option<Vec<LineItem>>,
    /// Push notification token, if one was registered
    pub push_token: Option<String>,
    /// Lifetime number of orders (maintained by counter increments)
    pub total_orders: u64,
    /// Lifetime spend (maintained by counter increments)
    pub total_spent: Price,
}

/// Authenticated document store for user profiles.
///
/// All writes are keyed by user id and update only the named fields;
/// nothing else in the document is touched.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the profile document, or `None` if the user has none yet.
    ///
    /// # Errors
    ///
    /// Returns `RemoteStoreError` if the store is unreachable or the
    /// document does not decode.
    async fn fetch_profile(&self, user: &UserId)
    -> Result<Option<RemoteProfile>, RemoteStoreError>;

    /// Replace the profile's cart mirror with `items`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteStoreError` if the write does not go through.
    async fn put_cart(&self, user: &UserId, items: &[LineItem]) -> Result<(), RemoteStoreError>;

    /// Replace the profile's push notification token.
    ///
    /// # Errors
    ///
    /// Returns `RemoteStoreError` if the write does not go through.
    async fn put_push_token(&self, user: &UserId, token: &str) -> Result<(), RemoteStoreError>;

    /// Atomically increment `total_orders` by one and `total_spent` by
    /// `order_total`. Not atomic with [`Self::append_order`]; a crash
    /// between the two leaves the counters and the collection
    /// inconsistent, which the advisory ledger tolerates.
    ///
    /// # Errors
    ///
    /// Returns `RemoteStoreError` if the increment does not go through.
    async fn bump_order_counters(
        &self,
        user: &UserId,
        order_total: Price,
    ) -> Result<(), RemoteStoreError>;

    /// Append an order to the user's order collection.
    ///
    /// # Errors
    ///
    /// Returns `RemoteStoreError` if the append does not go through.
    async fn append_order(&self, user: &UserId, order: &Order) -> Result<(), RemoteStoreError>;

    /// Append a contact message to the user's message collection.
    ///
    /// # Errors
    ///
    /// Returns `RemoteStoreError` if the append does not go through.
    async fn append_message(
        &self,
        user: &UserId,
        message: &ContactMessage,
    ) -> Result<(), RemoteStoreError>;
}
