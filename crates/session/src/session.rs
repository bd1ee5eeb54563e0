//! The storefront session: one explicitly constructed state object that
//! owns the cart, shelves, and order ledger for the current shopper.
//!
//! Every collaborator (local store, remote store, auth, notifier) is
//! injected at construction, so the session can be driven end to end
//! with fakes. Mutations follow one script: update in-memory state,
//! persist the snapshot to the local store (must succeed), then hand a
//! copy to the sync queue (best effort, never awaited).

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use coursecart_core::{OrderNumber, Price, ProductSlug};

use crate::auth::SessionProvider;
use crate::cart::{Cart, LineItem, Product};
use crate::config::SessionConfig;
use crate::contact::{ContactForm, ContactMessage};
use crate::error::{Result, ValidationError};
use crate::insights::{self, CartAnalytics, Recommendation};
use crate::local::LocalStore;
use crate::notify::{Notifier, ToastLevel};
use crate::orders::{CheckoutForm, Order, OrderLedger};
use crate::remote::RemoteStore;
use crate::saved::{RecentlyViewed, SavedItem, Wishlist};
use crate::sync::{SyncJob, SyncQueue};

/// Shopper-session state handle.
///
/// Cheaply cloneable via `Arc`; clones share the same state. The
/// in-memory copy is authoritative for the session, the local store
/// mirrors it durably, and the remote store trails behind on a
/// best-effort basis.
#[derive(Clone)]
pub struct StorefrontSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: SessionConfig,
    local: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteStore>,
    auth: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
    sync: SyncQueue,
    state: Mutex<SessionState>,
}

#[derive(Default)]
struct SessionState {
    cart: Cart,
    wishlist: Wishlist,
    recently_viewed: RecentlyViewed,
    orders: OrderLedger,
}

impl StorefrontSession {
    /// Build a session: validate the config, load persisted state from
    /// the local store, and spawn the sync worker.
    ///
    /// Stored sequences that are missing or fail to decode start empty
    /// (with a warning); a shopper with a corrupt cart string should
    /// get an empty cart, not a broken page.
    ///
    /// Must be called from within a tokio runtime. Call
    /// [`spawn_reconciler`](Self::spawn_reconciler) afterwards if the
    /// session should pick up the remote cart on sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn start(
        config: SessionConfig,
        local: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteStore>,
        auth: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        config.validate()?;

        let keys = &config.storage;
        let state = SessionState {
            cart: Cart::from_items(load_sequence(local.as_ref(), &keys.cart)),
            wishlist: Wishlist::from_items(load_sequence(local.as_ref(), &keys.wishlist)),
            recently_viewed: RecentlyViewed::from_items(load_sequence(
                local.as_ref(),
                &keys.recently_viewed,
            )),
            orders: OrderLedger::from_orders(load_sequence(local.as_ref(), &keys.orders)),
        };

        let sync = SyncQueue::spawn(
            Arc::clone(&remote),
            Arc::clone(&auth),
            config.sync_queue_capacity,
        );

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                local,
                remote,
                auth,
                notifier,
                sync,
                state: Mutex::new(state),
            }),
        })
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of `product` to the cart, merging into an existing
    /// line with the same derived slug.
    ///
    /// # Errors
    ///
    /// Returns a validation error (also toasted) if the product name
    /// yields no slug; the cart is untouched in that case. Local
    /// persistence failures are returned as-is.
    #[instrument(skip(self, product), fields(product = %product.name))]
    pub fn add_to_cart(&self, product: Product) -> Result<()> {
        let name = product.name.clone();
        let outcome = {
            let mut state = self.inner.state.lock();
            state
                .cart
                .add(product)
                .map(|slug| (slug, state.cart.items().to_vec()))
        };
        let (slug, snapshot) = match outcome {
            Ok(pair) => pair,
            Err(e) => return Err(self.reject(ValidationError::from(e))),
        };

        self.persist(&self.inner.config.storage.cart, &snapshot)?;
        self.inner.sync.enqueue(SyncJob::PushCart(snapshot));
        self.inner
            .notifier
            .toast(ToastLevel::Success, &format!("{name} added to cart"));
        debug!(slug = %slug, "Added to cart");
        Ok(())
    }

    /// Remove the line with the given slug. Removing an absent slug is
    /// a benign no-op, but the (unchanged) cart is still persisted and
    /// synced like any other mutation.
    ///
    /// # Errors
    ///
    /// Returns an error only if local persistence fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub fn remove_from_cart(&self, slug: &ProductSlug) -> Result<()> {
        let (removed_name, snapshot) = {
            let mut state = self.inner.state.lock();
            let name = state.cart.get(slug).map(|item| item.name.clone());
            state.cart.remove(slug);
            (name, state.cart.items().to_vec())
        };

        self.persist(&self.inner.config.storage.cart, &snapshot)?;
        self.inner.sync.enqueue(SyncJob::PushCart(snapshot));
        match removed_name {
            Some(name) => self
                .inner
                .notifier
                .toast(ToastLevel::Info, &format!("{name} removed from cart")),
            None => debug!("Remove for absent line, nothing to do"),
        }
        Ok(())
    }

    /// Set the quantity of an existing line. Zero is equivalent to
    /// [`remove_from_cart`](Self::remove_from_cart); an absent slug is
    /// a benign no-op.
    ///
    /// # Errors
    ///
    /// Returns an error only if local persistence fails.
    #[instrument(skip(self), fields(slug = %slug, quantity))]
    pub fn set_quantity(&self, slug: &ProductSlug, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return self.remove_from_cart(slug);
        }

        let (changed, snapshot) = {
            let mut state = self.inner.state.lock();
            let changed = state.cart.set_quantity(slug, quantity);
            (changed, state.cart.items().to_vec())
        };

        self.persist(&self.inner.config.storage.cart, &snapshot)?;
        self.inner.sync.enqueue(SyncJob::PushCart(snapshot));
        if !changed {
            debug!("Quantity update for absent line, nothing to do");
        }
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error only if local persistence fails.
    #[instrument(skip(self))]
    pub fn clear_cart(&self) -> Result<()> {
        {
            let mut state = self.inner.state.lock();
            state.cart.clear();
        }

        self.persist(&self.inner.config.storage.cart, &Vec::<LineItem>::new())?;
        self.inner.sync.enqueue(SyncJob::PushCart(Vec::new()));
        self.inner.notifier.toast(ToastLevel::Info, "Cart cleared");
        Ok(())
    }

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn cart(&self) -> Vec<LineItem> {
        self.inner.state.lock().cart.items().to_vec()
    }

    /// Sum of `price * quantity` over the cart.
    #[must_use]
    pub fn total(&self) -> Price {
        self.inner.state.lock().cart.total()
    }

    /// Sum of quantities over the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.inner.state.lock().cart.item_count()
    }

    // =========================================================================
    // Wishlist and recently viewed
    // =========================================================================

    /// Save a product to the wishlist. Saving a product that is already
    /// there is a no-op (toasted as such, not an error).
    ///
    /// # Errors
    ///
    /// Returns a validation error (also toasted) if the product name
    /// yields no slug, or an error if local persistence fails.
    #[instrument(skip(self, product), fields(product = %product.name))]
    pub fn add_to_wishlist(&self, product: Product) -> Result<()> {
        let item = match SavedItem::new(product) {
            Ok(item) => item,
            Err(e) => return Err(self.reject(ValidationError::from(e))),
        };
        let name = item.name.clone();

        let (added, snapshot) = {
            let mut state = self.inner.state.lock();
            let added = state.wishlist.add(item);
            (added, state.wishlist.items().to_vec())
        };

        if added {
            self.persist(&self.inner.config.storage.wishlist, &snapshot)?;
            self.inner
                .notifier
                .toast(ToastLevel::Success, &format!("{name} added to wishlist"));
        } else {
            self.inner
                .notifier
                .toast(ToastLevel::Info, "Already in your wishlist");
        }
        Ok(())
    }

    /// Remove a product from the wishlist; absent slugs are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error only if local persistence fails.
    pub fn remove_from_wishlist(&self, slug: &ProductSlug) -> Result<()> {
        let (removed, snapshot) = {
            let mut state = self.inner.state.lock();
            let removed = state.wishlist.remove(slug);
            (removed, state.wishlist.items().to_vec())
        };

        if removed {
            self.persist(&self.inner.config.storage.wishlist, &snapshot)?;
        }
        Ok(())
    }

    /// Wishlist contents in insertion order.
    #[must_use]
    pub fn wishlist(&self) -> Vec<SavedItem> {
        self.inner.state.lock().wishlist.items().to_vec()
    }

    /// Note that the shopper viewed a product, moving it to the front
    /// of the recently-viewed shelf.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the product name yields no slug,
    /// or an error if local persistence fails. No toast either way;
    /// this runs behind page views, not user actions.
    pub fn record_view(&self, product: Product) -> Result<()> {
        let item = SavedItem::new(product).map_err(ValidationError::from)?;

        let snapshot = {
            let mut state = self.inner.state.lock();
            state.recently_viewed.record(item);
            state.recently_viewed.items().to_vec()
        };

        self.persist(&self.inner.config.storage.recently_viewed, &snapshot)?;
        Ok(())
    }

    /// Recently-viewed products, most recent first, at most
    /// [`RecentlyViewed::CAPACITY`] of them.
    #[must_use]
    pub fn recently_viewed(&self) -> Vec<SavedItem> {
        self.inner.state.lock().recently_viewed.items().to_vec()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order for the current cart contents and clear the cart.
    ///
    /// The order lands in the local ledger synchronously; the remote
    /// append and counter bumps ride the sync queue.
    ///
    /// # Errors
    ///
    /// Returns a validation error (also toasted) for a bad form or an
    /// empty cart, with no state mutated. Local persistence failures
    /// are returned as-is.
    #[instrument(skip(self, form))]
    pub fn checkout(&self, form: &CheckoutForm) -> Result<Order> {
        let customer = match form.validate() {
            Ok(customer) => customer,
            Err(e) => return Err(self.reject(e)),
        };
        let placed_by = self.inner.auth.current_user();

        let placed = {
            let mut state = self.inner.state.lock();
            if state.cart.is_empty() {
                None
            } else {
                let items = state.cart.items().to_vec();
                let order = Order::place(customer, items, placed_by);
                state.orders.record(order.clone());
                state.cart.clear();
                Some((order, state.orders.orders().to_vec()))
            }
        };
        let Some((order, orders_snapshot)) = placed else {
            return Err(self.reject(ValidationError::EmptyCart));
        };

        self.persist(&self.inner.config.storage.orders, &orders_snapshot)?;
        self.persist(&self.inner.config.storage.cart, &Vec::<LineItem>::new())?;
        self.inner
            .sync
            .enqueue(SyncJob::RecordOrder(Box::new(order.clone())));
        self.inner.sync.enqueue(SyncJob::PushCart(Vec::new()));
        self.inner.notifier.toast(
            ToastLevel::Success,
            &format!("Order {} placed. Thank you!", order.number),
        );
        info!(order = %order.number, total = %order.total, "Order placed");
        Ok(order)
    }

    /// Append an already-built order to the ledger, bypassing checkout.
    /// Used when the order was assembled elsewhere (a payment flow, an
    /// import); the same persistence and sync policy applies.
    ///
    /// # Errors
    ///
    /// Returns an error only if local persistence fails.
    #[instrument(skip(self, order), fields(order = %order.number))]
    pub fn record_order(&self, order: Order) -> Result<()> {
        let snapshot = {
            let mut state = self.inner.state.lock();
            state.orders.record(order.clone());
            state.orders.orders().to_vec()
        };

        self.persist(&self.inner.config.storage.orders, &snapshot)?;
        self.inner.sync.enqueue(SyncJob::RecordOrder(Box::new(order)));
        Ok(())
    }

    /// Look up an order by number; `None` (not an error) when absent.
    #[must_use]
    pub fn find_order(&self, number: &OrderNumber) -> Option<Order> {
        self.inner.state.lock().orders.find(number).cloned()
    }

    /// Order history, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.inner.state.lock().orders.orders().to_vec()
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Analytics snapshot for the current cart.
    #[must_use]
    pub fn analytics(&self) -> CartAnalytics {
        insights::analytics(&self.inner.state.lock().cart)
    }

    /// Course suggestions for the current cart's categories.
    #[must_use]
    pub fn recommendations(&self) -> Vec<Recommendation> {
        insights::recommendations_for(&self.inner.state.lock().cart)
    }

    // =========================================================================
    // Messaging and push
    // =========================================================================

    /// Register a push notification token for the signed-in user.
    /// Queued best-effort like every other remote write; for a
    /// signed-out session the job is skipped at dispatch.
    pub fn set_push_token(&self, token: impl Into<String>) {
        self.inner.sync.enqueue(SyncJob::PushToken(token.into()));
    }

    /// Validate and send a contact form message. Delivery is
    /// best-effort; the shopper sees a thank-you toast as soon as the
    /// message validates.
    ///
    /// # Errors
    ///
    /// Returns a validation error (also toasted) for a bad form.
    pub fn submit_message(&self, form: &ContactForm) -> Result<ContactMessage> {
        let message = match form.validate() {
            Ok(message) => message,
            Err(e) => return Err(self.reject(e)),
        };

        self.inner
            .sync
            .enqueue(SyncJob::SendMessage(Box::new(message.clone())));
        self.inner
            .notifier
            .toast(ToastLevel::Success, "Thanks! We'll get back to you soon.");
        Ok(message)
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Replace the local cart with the remote one, wholesale.
    ///
    /// No-ops (with a log line) when signed out, when the user has no
    /// profile or no remote cart, or when the fetch fails; a fetch
    /// problem must never wipe the local cart. There is no field-level
    /// merge: concurrent sessions for the same account can silently
    /// drop local-only changes, which is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error only if persisting the fetched cart locally
    /// fails.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<()> {
        let Some(user) = self.inner.auth.current_user() else {
            debug!("Not signed in, nothing to reconcile");
            return Ok(());
        };

        let profile = match self.inner.remote.fetch_profile(&user.id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                debug!(user = %user.id, "No remote profile yet");
                return Ok(());
            }
            Err(e) => {
                warn!(user = %user.id, error = %e, "Profile fetch failed, keeping local cart");
                return Ok(());
            }
        };
        let Some(items) = profile.cart else {
            debug!(user = %user.id, "Remote profile has no cart");
            return Ok(());
        };

        let snapshot = {
            let mut state = self.inner.state.lock();
            state.cart = Cart::from_items(items);
            state.cart.items().to_vec()
        };
        self.persist(&self.inner.config.storage.cart, &snapshot)?;
        info!(user = %user.id, lines = snapshot.len(), "Replaced local cart with remote cart");
        Ok(())
    }

    /// Spawn a task that reconciles now and again after every sign-in.
    ///
    /// The task exits when the auth stream closes (the provider was
    /// dropped). Sign-outs do not touch the cart; whatever is local
    /// simply stays.
    pub fn spawn_reconciler(&self) -> JoinHandle<()> {
        let session = self.clone();
        let mut auth_changes = self.inner.auth.subscribe();
        tokio::spawn(async move {
            session.reconcile_and_log().await;
            while auth_changes.changed().await.is_ok() {
                let signed_in = auth_changes.borrow_and_update().is_some();
                if signed_in {
                    session.reconcile_and_log().await;
                }
            }
            debug!("Auth stream closed, reconciler exiting");
        })
    }

    async fn reconcile_and_log(&self) {
        if let Err(e) = self.reconcile().await {
            warn!(error = %e, "Reconciliation could not persist the remote cart");
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Toast a validation failure and hand it back as a session error.
    fn reject(&self, error: ValidationError) -> crate::error::SessionError {
        self.inner
            .notifier
            .toast(ToastLevel::Error, &error.user_message());
        error.into()
    }

    /// Serialize `value` and write it under `key` in the local store.
    fn persist<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.inner.local.set(key, &encoded)?;
        Ok(())
    }
}

/// Load a JSON sequence from the local store, treating a missing key,
/// a failed read, or malformed JSON as an empty sequence. Reads must
/// never stop a session from starting.
fn load_sequence<T: DeserializeOwned>(local: &dyn LocalStore, key: &str) -> Vec<T> {
    let stored = match local.get(key) {
        Ok(Some(stored)) => stored,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Local read failed, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&stored) {
        Ok(items) => items,
        Err(e) => {
            warn!(key, error = %e, "Stored state is malformed, starting empty");
            Vec::new()
        }
    }
}
