//! Core types for coursecart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod slug;

pub use email::{Email, EmailError};
pub use id::{OrderNumber, UserId};
pub use price::{Price, PriceError};
pub use slug::{ProductSlug, SlugError};
