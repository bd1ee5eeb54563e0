//! Unified error handling for the session.
//!
//! Every fallible session operation returns `Result<T, SessionError>`.
//! Validation failures are the only errors a shopper is ever told about;
//! remote sync failures are logged and swallowed by design (the local
//! copy stays authoritative), so they never appear here.

use thiserror::Error;

use coursecart_core::{EmailError, SlugError};

use crate::config::ConfigError;
use crate::local::LocalStoreError;

/// Rejected user input. Raised before any state is mutated.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required form field was empty or missing.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An email address failed validation.
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    /// A product name could not be turned into a slug.
    #[error("Invalid product name: {0}")]
    ProductName(#[from] SlugError),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,
}

impl ValidationError {
    /// Shopper-facing message, suitable for a toast.
    ///
    /// Kept separate from `Display` so internal detail (slug rules,
    /// email grammar) never leaks into the UI.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField(field) => format!("Please fill in the {field} field"),
            Self::Email(_) => "Please enter a valid email address".to_string(),
            Self::ProductName(_) => "This product cannot be added right now".to_string(),
            Self::EmptyCart => "Your cart is empty".to_string(),
        }
    }
}

/// Session-level error type.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration rejected at startup.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// User input rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The local store failed a read or write. Local persistence is the
    /// source of truth, so this is surfaced rather than swallowed.
    #[error("Local store error: {0}")]
    Local(#[from] LocalStoreError),

    /// State could not be serialized for persistence.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for `SessionError`.
pub type Result<T> = std::result::Result<T, SessionError>;
