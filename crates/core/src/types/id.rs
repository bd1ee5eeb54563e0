//! Newtype identifiers for type-safe entity references.
//!
//! Identities in this system are opaque strings handed out by external
//! collaborators (the auth session) or generated locally (order numbers).
//! The `define_string_id!` macro builds a newtype per entity so the two can
//! never be mixed up.

use uuid::Uuid;

/// Macro to define a type-safe string id wrapper.
///
/// Creates a newtype around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `new()` and `as_str()` accessors
/// - `Display` and `From<String>`/`From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use coursecart_core::define_string_id;
/// define_string_id!(CustomerId);
/// define_string_id!(CouponId);
///
/// let customer = CustomerId::new("u-123");
/// let coupon = CouponId::new("u-123");
///
/// // These are different types, so this won't compile:
/// // let _: CustomerId = coupon;
/// ```
#[macro_export]
macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

define_string_id!(UserId);
define_string_id!(OrderNumber);

impl OrderNumber {
    /// Length of the random suffix in a generated order number.
    const SUFFIX_LENGTH: usize = 10;

    /// Generate a fresh order number (`ORD-` plus ten hex characters).
    ///
    /// The order ledger is advisory, so uniqueness here is probabilistic
    /// rather than guaranteed.
    #[must_use]
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        let suffix: String = hex
            .chars()
            .take(Self::SUFFIX_LENGTH)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self(format!("ORD-{suffix}"))
    }
}
