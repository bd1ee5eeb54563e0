//! CourseCart Session - Storefront session state library.
//!
//! This crate owns everything a shopper's browser session keeps track
//! of: the cart, the wishlist, the recently-viewed shelf, and the local
//! order ledger. It is UI-free and I/O-free at the edges; the embedding
//! application injects the storage, auth, and notification
//! collaborators when it builds the [`StorefrontSession`].
//!
//! # Architecture
//!
//! The in-memory state is authoritative for the session. Every mutation
//! writes a JSON snapshot to the injected [`LocalStore`] synchronously
//! (a failure there is an error), then hands a copy to a background
//! queue that mirrors it to the [`RemoteStore`] on a best-effort basis:
//! remote failures are logged and swallowed, never retried, and never
//! block or fail the mutation. On sign-in the remote cart, when one
//! exists, replaces the local cart wholesale.
//!
//! # Modules
//!
//! - [`session`] - The [`StorefrontSession`] orchestrator
//! - [`cart`] - Cart lines keyed by derived product slug
//! - [`orders`] - Checkout validation and the append-only order ledger
//! - [`saved`] - Wishlist and the bounded recently-viewed shelf
//! - [`insights`] - Cart analytics, categorization, and recommendations
//! - [`local`] / [`remote`] / [`auth`] / [`notify`] - Injected collaborators
//! - [`chat`] - Keyword-matching support autoresponder
//! - [`contact`] - Contact form validation
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use coursecart_session::{
//!     AuthState, MemoryStore, NullNotifier, Product, SessionConfig, StorefrontSession,
//! };
//!
//! let auth = Arc::new(AuthState::signed_out());
//! let session = StorefrontSession::start(
//!     SessionConfig::default(),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MyFirestoreBackend::connect()?),
//!     Arc::clone(&auth) as _,
//!     Arc::new(NullNotifier),
//! )?;
//! session.spawn_reconciler();
//!
//! session.add_to_cart(Product {
//!     name: "Machine Learning 101".to_string(),
//!     price: Price::from_cents(99_00),
//!     image: "https://cdn.example/ml101.jpg".to_string(),
//! })?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod chat;
pub mod config;
pub mod contact;
pub mod error;
pub mod insights;
pub mod local;
pub mod notify;
pub mod orders;
pub mod remote;
pub mod saved;
pub mod session;

mod sync;

#[cfg(test)]
mod test_support;

pub use auth::{AuthState, CurrentUser, SessionProvider};
pub use cart::{Cart, LineItem, Product};
pub use chat::Autoresponder;
pub use config::{SessionConfig, StorageKeys};
pub use contact::{ContactForm, ContactMessage};
pub use error::{Result, SessionError, ValidationError};
pub use insights::{CartAnalytics, Category, Recommendation};
pub use local::{LocalStore, LocalStoreError, MemoryStore};
pub use notify::{Notifier, NullNotifier, ToastLevel};
pub use orders::{CheckoutForm, CustomerInfo, Order, OrderLedger};
pub use remote::{RemoteProfile, RemoteStore, RemoteStoreError};
pub use saved::{RecentlyViewed, SavedItem, Wishlist};
pub use session::StorefrontSession;
