//! Derived product slugs.
//!
//! A [`ProductSlug`] is the cart's line-item key. It is derived
//! deterministically from the product name, never assigned: the name is
//! lowercased, every run of non-alphanumeric characters collapses to a single
//! hyphen, and leading/trailing hyphens are trimmed.
//!
//! Two distinct products whose names normalize to the same text produce the
//! same slug. That is a known, accepted limitation of name-derived keys, not
//! something callers should compensate for.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when deriving a [`ProductSlug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The name contains no alphanumeric characters to build a slug from.
    #[error("product name has no alphanumeric characters")]
    Empty,
}

/// A product slug derived from a product name.
///
/// ## Examples
///
/// ```
/// use coursecart_core::ProductSlug;
///
/// let slug = ProductSlug::derive("Machine Learning 101").unwrap();
/// assert_eq!(slug.as_str(), "machine-learning-101");
///
/// // Runs of punctuation and whitespace collapse to one hyphen
/// let slug = ProductSlug::derive("Rust -- Zero to Hero!").unwrap();
/// assert_eq!(slug.as_str(), "rust-zero-to-hero");
///
/// // A name with nothing to keep is rejected
/// assert!(ProductSlug::derive("!!!").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductSlug(String);

impl ProductSlug {
    /// Derive a slug from a product name.
    ///
    /// Lowercases the name, collapses every run of non-alphanumeric
    /// characters to a single hyphen, and trims hyphens from both ends.
    /// The derivation is pure: the same name always yields the same slug.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if the name contains no alphanumeric
    /// characters at all.
    pub fn derive(name: &str) -> Result<Self, SlugError> {
        let mut slug = String::with_capacity(name.len());
        let mut pending_hyphen = false;

        for c in name.to_lowercase().chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c);
            } else {
                pending_hyphen = true;
            }
        }

        if slug.is_empty() {
            return Err(SlugError::Empty);
        }

        Ok(Self(slug))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the slug and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProductSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
