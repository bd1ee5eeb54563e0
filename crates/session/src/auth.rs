//! Auth session collaborator.
//!
//! The session never authenticates anyone itself; it only asks "who is
//! signed in right now" and subscribes to changes so it can reconcile
//! the cart when someone signs in (see
//! [`StorefrontSession::spawn_reconciler`](crate::StorefrontSession::spawn_reconciler)).

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use coursecart_core::{Email, UserId};

/// The signed-in user as reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Opaque account id from the auth provider
    pub id: UserId,
    /// Verified account email
    pub email: Email,
}

/// Source of truth for the current auth state.
///
/// `subscribe` hands out a [`watch::Receiver`] whose value is the
/// current user (or `None` when signed out); the receiver is notified
/// on every sign-in and sign-out.
pub trait SessionProvider: Send + Sync {
    /// The user signed in right now, if any.
    fn current_user(&self) -> Option<CurrentUser>;

    /// Subscribe to auth-state changes.
    fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>>;
}

/// A [`SessionProvider`] the embedding application drives directly.
///
/// Wrap it in an [`Arc`](std::sync::Arc), hand a clone to the session,
/// and call [`sign_in`](Self::sign_in) / [`sign_out`](Self::sign_out)
/// from the auth layer's callbacks.
#[derive(Debug)]
pub struct AuthState {
    tx: watch::Sender<Option<CurrentUser>>,
}

impl AuthState {
    /// Start with the given auth state, usually `None`.
    #[must_use]
    pub fn new(initial: Option<CurrentUser>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Start signed out.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::new(None)
    }

    /// Report a sign-in to every subscriber.
    pub fn sign_in(&self, user: CurrentUser) {
        self.tx.send_replace(Some(user));
    }

    /// Report a sign-out to every subscriber.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::signed_out()
    }
}

impl SessionProvider for AuthState {
    fn current_user(&self) -> Option<CurrentUser> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> CurrentUser {
        CurrentUser {
            id: UserId::new("u-1"),
            email: Email::parse("shopper@example.com").unwrap(),
        }
    }

    #[test]
    fn test_auth_state_tracks_sign_in_and_out() {
        let auth = AuthState::signed_out();
        assert!(auth.current_user().is_none());

        auth.sign_in(user());
        assert_eq!(auth.current_user().unwrap().id, UserId::new("u-1"));

        auth.sign_out();
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let auth = AuthState::signed_out();
        let mut rx = auth.subscribe();

        auth.sign_in(user());
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        auth.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }
}
