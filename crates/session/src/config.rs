//! Session configuration supplied by the embedding application.
//!
//! Unlike a server binary there is no environment to read: the host
//! application constructs a [`SessionConfig`] (usually via [`Default`])
//! and hands it to [`StorefrontSession::start`](crate::StorefrontSession::start),
//! which validates it before any state is touched.

use thiserror::Error;

/// Default bound for the remote sync queue.
///
/// Jobs beyond this many in flight are dropped (the local copy is still
/// the source of truth, so a dropped push only delays convergence until
/// the next mutation).
pub const DEFAULT_SYNC_QUEUE_CAPACITY: usize = 32;

/// Default storage keys, namespaced to avoid collisions with whatever
/// else the host application keeps in the same key-value store.
pub mod keys {
    /// Cart line items (JSON array of `LineItem`).
    pub const CART: &str = "coursecart.cart";
    /// Order history ledger (JSON array of `Order`).
    pub const ORDERS: &str = "coursecart.orders";
    /// Wishlist entries (JSON array of `SavedItem`).
    pub const WISHLIST: &str = "coursecart.wishlist";
    /// Recently-viewed shelf (JSON array of `SavedItem`, most recent first).
    pub const RECENTLY_VIEWED: &str = "coursecart.recently-viewed";
}

/// Configuration errors reported by [`SessionConfig::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Storage key for {0} must not be empty")]
    EmptyStorageKey(&'static str),
    #[error("Storage key {0:?} is used for more than one sequence")]
    DuplicateStorageKey(String),
    #[error("Sync queue capacity must be at least 1")]
    ZeroQueueCapacity,
}

/// Keys under which each persisted sequence lives in the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Cart line items
    pub cart: String,
    /// Order history ledger
    pub orders: String,
    /// Wishlist entries
    pub wishlist: String,
    /// Recently-viewed shelf
    pub recently_viewed: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            cart: keys::CART.to_string(),
            orders: keys::ORDERS.to_string(),
            wishlist: keys::WISHLIST.to_string(),
            recently_viewed: keys::RECENTLY_VIEWED.to_string(),
        }
    }
}

impl StorageKeys {
    fn validate(&self) -> Result<(), ConfigError> {
        let labeled = [
            ("cart", &self.cart),
            ("orders", &self.orders),
            ("wishlist", &self.wishlist),
            ("recently viewed", &self.recently_viewed),
        ];
        for (label, key) in &labeled {
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyStorageKey(label));
            }
        }
        // Reused keys would silently overwrite one sequence with another.
        for (i, (_, key)) in labeled.iter().enumerate() {
            if labeled.iter().skip(i + 1).any(|(_, other)| other == key) {
                return Err(ConfigError::DuplicateStorageKey((*key).clone()));
            }
        }
        Ok(())
    }
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Local storage keys for each persisted sequence
    pub storage: StorageKeys,
    /// Bound on the remote sync queue; excess jobs are dropped
    pub sync_queue_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            sync_queue_capacity: DEFAULT_SYNC_QUEUE_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Check the configuration for values that would misbehave at runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a storage key is empty or reused, or if the
    /// sync queue capacity is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;
        if self.sync_queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_storage_key_rejected() {
        let mut config = SessionConfig::default();
        config.storage.wishlist = "   ".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyStorageKey("wishlist")));
    }

    #[test]
    fn test_duplicate_storage_key_rejected() {
        let mut config = SessionConfig::default();
        config.storage.orders.clone_from(&config.storage.cart);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateStorageKey(_)));
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let config = SessionConfig {
            sync_queue_capacity: 0,
            ..SessionConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ZeroQueueCapacity));
    }

    #[test]
    fn test_default_keys_are_namespaced() {
        let keys = StorageKeys::default();
        assert!(keys.cart.starts_with("coursecart."));
        assert!(keys.recently_viewed.starts_with("coursecart."));
    }
}
