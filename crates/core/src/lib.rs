//! Coursecart Core - Shared types library.
//!
//! This crate provides common types used across all coursecart components:
//! - `session` - Client-side storefront session state (cart, orders, shelves)
//! - `integration-tests` - End-to-end scenarios against fake collaborators
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no network
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product slugs, prices, emails, and ids

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
